use crate::collections::rb_map::*;
use rand::{seq::SliceRandom, Rng, SeedableRng};

const REP: usize = if cfg!(miri) { 2 } else { 20 };
const N: usize = if cfg!(miri) { 100 } else { 10000 };

fn init_logging() {
    let _ = simplelog::TestLogger::init(simplelog::LevelFilter::Debug, simplelog::Config::default());
}

fn keys<K: Copy, V, C>(map: &RbMap<K, V, C>) -> Vec<K> {
    map.keys().copied().collect()
}

fn seven() -> RbMap<i32, String> {
    (1..=7).map(|i| (i, i.to_string())).collect()
}

struct BadClone {
    x: usize,
}
impl Clone for BadClone {
    fn clone(&self) -> Self {
        if self.x == 50 {
            panic!();
        }
        Self { x: self.x }
    }
}

#[test]
fn exp_bad_clone_test() {
    let mut map = RbMap::new();
    for i in 0..100 {
        map.insert(i, BadClone { x: i });
    }
    let _ = std::panic::catch_unwind(|| {
        let _ = map.clone();
    });
    assert!(map.len() == 100);
    assert!(map[&99].x == 99);
}

#[test]
fn insert_two_test() {
    let mut m = RbMap::new();
    assert!(m.is_empty());
    assert!(m.cursor_front() == m.cursor_end());
    m.insert(3, "Three");
    m.insert(7, "Seven");
    assert!(m.len() == 2);
    assert!(m.iter().collect::<Vec<_>>() == [(&3, &"Three"), (&7, &"Seven")]);
    m.validate().unwrap();
}

#[test]
fn from_list_test() {
    let m = RbMap::from([(2, "Apple"), (5, "Orange"), (1, "Grape"), (4, "Banana")]);
    assert!(m.len() == 4);
    assert!(keys(&m) == [1, 2, 4, 5]);
    assert!(m.values().copied().collect::<Vec<_>>() == ["Grape", "Apple", "Banana", "Orange"]);
    m.validate().unwrap();
}

#[test]
fn erase_key_test() {
    let mut m = seven();
    assert!(m.erase(&3) == 1);
    assert!(m.len() == 6);
    assert!(!m.contains_key(&3));
    assert!(m.find(&3).is_end());
    assert!(keys(&m) == [1, 2, 4, 5, 6, 7]);
    for k in [1, 2, 4, 5, 6, 7] {
        assert!(m[&k] == k.to_string());
    }
    assert!(m.erase(&3) == 0);
    assert!(m.len() == 6);
    m.validate().unwrap();
}

#[test]
fn at_test() {
    let mut m = seven();
    assert!(m.at(&2).unwrap() == "2");
    *m.at_mut(&2).unwrap() = "Mango".to_string();
    assert!(m[&2] == "Mango");
    let e = m.at(&8).unwrap_err();
    assert!(e == KeyNotFoundError {});
    assert!(e.to_string() == "given key is not in map");
    assert!(m.at_mut(&0).is_err());
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_absent_test() {
    let m = seven();
    let _ = &m[&10];
}

#[test]
fn cursor_range_erase_test() {
    let mut m = seven();
    let mut c = m.find_mut(&3);
    while c.key() != Some(&6) {
        assert!(c.remove_current().is_some());
    }
    assert!(c.key() == Some(&6));
    assert!(keys(&m) == [1, 2, 6, 7]);
    m.validate().unwrap();
}

#[test]
fn remove_range_test() {
    let mut m = seven();
    assert!(m.remove_range(3..6) == 3);
    assert!(keys(&m) == [1, 2, 6, 7]);
    m.validate().unwrap();

    let mut m = seven();
    assert!(m.remove_range(..=2) == 2);
    assert!(m.remove_range(6..) == 2);
    assert!(keys(&m) == [3, 4, 5]);
    assert!(m.remove_range(10..20) == 0);
    assert!(m.remove_range::<i32, _>(..) == 3);
    assert!(m.is_empty());
    m.validate().unwrap();

    let mut m = seven();
    assert!(m.remove_range((std::ops::Bound::Excluded(2), std::ops::Bound::Included(4))) == 2);
    assert!(keys(&m) == [1, 2, 5, 6, 7]);
}

#[test]
fn remove_current_returns_next_test() {
    // Removing nodes with two children moves pairs around; the cursor must still land on the successor.
    let mut m: RbMap<usize, usize> = (0..200).map(|i| (i, i)).collect();
    let mut c = m.find_mut(&50);
    for expect in 51..120 {
        let (k, _) = c.remove_current().unwrap();
        assert!(k == expect - 1);
        assert!(c.key() == Some(&expect));
    }
    m.validate().unwrap();
    assert!(m.len() == 200 - 69);

    let mut c = m.cursor_back_mut();
    assert!(c.remove_current() == Some((199, 199)));
    assert!(c.is_end());
    assert!(c.remove_current().is_none());
    m.validate().unwrap();
}

#[test]
fn bounds_test() {
    let m: RbMap<i32, i32> = [10, 20, 30, 40].iter().map(|&k| (k, k)).collect();
    assert!(m.lower_bound(&20).key() == Some(&20));
    assert!(m.lower_bound(&21).key() == Some(&30));
    assert!(m.lower_bound(&5).key() == Some(&10));
    assert!(m.lower_bound(&41).is_end());
    assert!(m.upper_bound(&20).key() == Some(&30));
    assert!(m.upper_bound(&19).key() == Some(&20));
    assert!(m.upper_bound(&5).key() == Some(&10));
    assert!(m.upper_bound(&40).is_end());

    for k in 0..50 {
        let (lo, hi) = m.equal_range(&k);
        assert!(lo == m.lower_bound(&k));
        assert!(hi == m.upper_bound(&k));
        if m.contains_key(&k) {
            assert!(lo.key() == Some(&k));
            let mut lo = lo;
            lo.move_next();
            assert!(lo == hi);
        } else {
            assert!(lo == hi);
        }
    }

    let e: RbMap<i32, i32> = RbMap::new();
    assert!(e.lower_bound(&1).is_end());
    assert!(e.upper_bound(&1).is_end());
    let (lo, hi) = e.equal_range(&1);
    assert!(lo.is_end() && hi.is_end());
}

#[test]
fn bounds_vs_std_test() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let mut exp = RbMap::new();
    let mut smap = std::collections::BTreeMap::new();
    for _ in 0..500 {
        let k = rng.gen_range(0..2000);
        exp.insert(k, ());
        smap.insert(k, ());
    }
    for k in -1..2001 {
        let lo = smap.range(k..).next().map(|(k, _)| k);
        let hi = smap
            .range((std::ops::Bound::Excluded(k), std::ops::Bound::Unbounded))
            .next()
            .map(|(k, _)| k);
        assert!(exp.lower_bound(&k).key() == lo);
        assert!(exp.upper_bound(&k).key() == hi);
    }
}

#[test]
fn cursor_walk_test() {
    let m = seven();
    let mut c = m.cursor_end();
    c.move_next();
    assert!(c == m.cursor_front());
    assert!(c.key() == Some(&1));
    assert!(c.peek_prev().is_none());
    assert!(c.peek_next().map(|(k, _)| *k) == Some(2));
    let mut c = m.cursor_end();
    c.move_prev();
    assert!(c == m.cursor_back());
    assert!(c.key() == Some(&7));
    c.move_next();
    assert!(c.is_end());
    assert!(c.key_value().is_none());

    let mut c = m.cursor_front();
    let mut fwd = Vec::new();
    while let Some(k) = c.key() {
        fwd.push(*k);
        c.move_next();
    }
    assert!(fwd == [1, 2, 3, 4, 5, 6, 7]);
    let mut c = m.cursor_back();
    let mut rev = Vec::new();
    while let Some(k) = c.key() {
        rev.push(*k);
        c.move_prev();
    }
    assert!(rev == [7, 6, 5, 4, 3, 2, 1]);
}

#[test]
fn cursor_mut_test() {
    let mut m = seven();
    let mut c = m.lower_bound_mut(&4);
    *c.value_mut().unwrap() = "four".to_string();
    c.move_prev();
    assert!(c.key() == Some(&3));
    assert!(c.as_cursor().peek_next().map(|(_, v)| v.as_str()) == Some("four"));
    let c = m.upper_bound_mut(&6);
    assert!(c.into_value_mut().map(|v| v.as_str()) == Some("7"));
    let c = m.upper_bound_mut(&7);
    assert!(c.into_value_mut().is_none());
    assert!(m[&4] == "four");
}

#[test]
fn get_or_default_test() {
    let mut m: RbMap<&str, usize> = RbMap::new();
    for w in "the cat sat on the mat the end".split(' ') {
        *m.get_or_default(w) += 1;
    }
    assert!(m["the"] == 3);
    assert!(m["cat"] == 1);
    assert!(m.len() == 6);
    assert!(*m.get_or_default("dog") == 0);
    assert!(m.len() == 7);
    m.validate().unwrap();
}

#[test]
fn insert_duplicate_test() {
    let mut m = RbMap::new();
    assert!(m.insert(5, "a").is_none());
    assert!(m.insert(5, "b") == Some("a"));
    assert!(m.len() == 1);
    let (c, created) = m.insert_entry(5, "c");
    assert!(!created);
    assert!(c.key_value() == Some((&5, &"c")));
    let (c, created) = m.insert_entry(6, "d");
    assert!(created);
    assert!(c.value() == Some(&"d"));
    assert!(m.len() == 2);
    assert!(m.count(&5) == 1 && m.count(&9) == 0);
}

#[test]
fn duplicate_keeps_stored_key_test() {
    // Keys compared case-insensitively: the first spelling stays.
    let mut m = RbMap::with_comparator(|a: &String, b: &String| a.to_lowercase() < b.to_lowercase());
    m.insert("Apple".to_string(), 1);
    m.insert("APPLE".to_string(), 2);
    assert!(m.len() == 1);
    assert!(m.first_key_value() == Some((&"Apple".to_string(), &2)));
}

#[test]
#[allow(clippy::reversed_empty_ranges)]
fn comparator_test() {
    let mut m = RbMap::with_comparator(Reversed(Natural));
    for i in 0..100 {
        m.insert(i, i);
    }
    m.validate().unwrap();
    assert!(m.first_key_value() == Some((&99, &99)));
    assert!(m.last_key_value() == Some((&0, &0)));
    assert!(m.lower_bound(&50).key() == Some(&50));
    assert!(m.upper_bound(&50).key() == Some(&49));
    assert!(m.range(60..=40).map(|(k, _)| *k).collect::<Vec<_>>() == (40..=60).rev().collect::<Vec<_>>());
    let _: &Reversed<Natural> = m.key_comp();
}

#[test]
fn borrowed_lookup_test() {
    let mut m = RbMap::new();
    m.insert("England".to_string(), "London");
    m.insert("France".to_string(), "Paris");
    assert!(m["France"] == "Paris");
    assert!(m.get("Spain").is_none());
    assert!(m.remove("England") == Some("London"));
    assert!(m.len() == 1);
}

#[test]
fn copy_independent_test() {
    let mut a = seven();
    let mut b = a.clone();
    assert!(a == b);
    b.validate().unwrap();
    a.insert(5, "Five".to_string());
    b.erase(&1);
    assert!(a[&5] == "Five");
    assert!(b[&5] == "5");
    assert!(a.contains_key(&1));
    assert!(keys(&b) == [2, 3, 4, 5, 6, 7]);
    a.validate().unwrap();
    b.validate().unwrap();

    let mut c: RbMap<i32, String> = (10..20).map(|i| (i, i.to_string())).collect();
    c.clone_from(&b);
    assert!(c == b);
    c.validate().unwrap();
}

#[test]
fn move_test() {
    let mut a = seven();
    let b = a.take();
    assert!(a.is_empty());
    assert!(a.cursor_front() == a.cursor_end());
    assert!(a.iter().next().is_none());
    a.validate().unwrap();
    assert!(keys(&b) == [1, 2, 3, 4, 5, 6, 7]);
    b.validate().unwrap();
    a.insert(1, "again".to_string());
    assert!(a.len() == 1);

    let mut c = b;
    let d = std::mem::take(&mut c);
    assert!(c.is_empty() && d.len() == 7);
}

#[test]
fn swap_test() {
    let mut a = RbMap::from([(3, "Three"), (7, "Seven")]);
    let mut b = RbMap::from([(2, "Apple"), (5, "Orange"), (1, "Grape"), (4, "Banana")]);
    a.swap(&mut b);
    assert!(a.len() == 4 && b.len() == 2);
    assert!(keys(&a) == [1, 2, 4, 5]);
    assert!(keys(&b) == [3, 7]);
    a.validate().unwrap();
    b.validate().unwrap();

    let mut r = RbMap::with_comparator(Reversed(Natural));
    let mut n = RbMap::with_comparator(Reversed(Natural));
    r.insert(1, ());
    r.insert(2, ());
    n.insert(9, ());
    r.swap(&mut n);
    assert!(keys(&r) == [9]);
    assert!(keys(&n) == [2, 1]);
}

#[test]
fn clear_test() {
    init_logging();
    let mut map = RbMap::new();
    for i in 0..N {
        map.insert(i as u32, 1u8);
    }
    map.clear();
    assert!(map.len() == 0);
    assert!(map.cursor_front().is_end() && map.cursor_back().is_end());
    map.validate().unwrap();
    map.insert(1, 1);
    assert!(map.len() == 1);
}

#[test]
fn pop_test() {
    let mut m = seven();
    assert!(m.pop_first().map(|(k, _)| k) == Some(1));
    assert!(m.pop_last().map(|(k, _)| k) == Some(7));
    m.validate().unwrap();
    assert!(keys(&m) == [2, 3, 4, 5, 6]);
    while m.pop_first().is_some() {
        m.validate().unwrap();
    }
    assert!(m.pop_last().is_none());
}

#[test]
fn retain_test() {
    let mut m: RbMap<usize, usize> = (0..1000).map(|i| (i, i)).collect();
    m.retain(|k, v| {
        *v += 1;
        k % 3 == 0
    });
    assert!(m.len() == 334);
    assert!(m.iter().all(|(k, v)| k % 3 == 0 && *v == k + 1));
    m.validate().unwrap();
}

#[test]
fn append_test() {
    let mut a: RbMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
    let mut b: RbMap<i32, i32> = (5..15).map(|i| (i, -i)).collect();
    a.append(&mut b);
    assert!(b.is_empty());
    b.validate().unwrap();
    assert!(a.len() == 15);
    assert!(a[&7] == -7 && a[&2] == 2);
    a.validate().unwrap();
}

#[test]
fn range_test() {
    let m: RbMap<i32, i32> = (0..100).map(|i| (i * 2, i)).collect();
    let v: Vec<i32> = m.range(10..20).map(|(k, _)| *k).collect();
    assert!(v == [10, 12, 14, 16, 18]);
    let v: Vec<i32> = m.range(11..=20).map(|(k, _)| *k).collect();
    assert!(v == [12, 14, 16, 18, 20]);
    let v: Vec<i32> = m.range(190..).rev().map(|(k, _)| *k).collect();
    assert!(v == [198, 196, 194, 192, 190]);
    assert!(m.range(11..12).next().is_none());
    assert!(m.range(500..).next().is_none());
    assert!(m.range(..-1).next().is_none());
    assert!(m.range::<i32, _>(..).count() == 100);
    let mut r = m.range(0..6);
    assert!(r.next().map(|(k, _)| *k) == Some(0));
    assert!(r.next_back().map(|(k, _)| *k) == Some(4));
    assert!(r.next().map(|(k, _)| *k) == Some(2));
    assert!(r.next_back().is_none());
    assert!(r.next().is_none());
}

#[test]
#[should_panic(expected = "range start is greater than range end")]
#[allow(clippy::reversed_empty_ranges)]
fn bad_range_test() {
    let m: RbMap<i32, i32> = (0..10).map(|i| (i, i)).collect();
    let _ = m.range(5..2);
}

#[test]
fn exp_iter_nm() {
    let n = N;
    let mut m = RbMap::<usize, usize>::new();
    for i in 0..n {
        m.insert(i, i);
    }
    for _rep in 0..REP {
        for (i, (k, v)) in m.iter().enumerate() {
            assert!(i == *k);
            assert!(i == *v);
        }
    }
    assert!(m.iter().len() == n);
    assert!(m.iter().rev().map(|(k, _)| *k).eq((0..n).rev()));
}

#[test]
fn exp_iter_mut() {
    let n = N;
    let mut m = RbMap::<usize, usize>::new();
    for i in 0..n {
        m.insert(i, i);
    }
    for (k, v) in m.iter_mut() {
        *v += *k;
    }
    for v in m.values_mut().rev() {
        *v += 1;
    }
    for (k, v) in &m {
        assert!(*v == 2 * k + 1);
    }
    let mut it = m.iter_mut();
    assert!(it.next().map(|(k, _)| *k) == Some(0));
    assert!(it.next_back().map(|(k, _)| *k) == Some(n - 1));
    assert!(it.len() == n - 2);
}

#[test]
fn exp_into_iter() {
    let n = N;
    let m: RbMap<usize, String> = (0..n).rev().map(|i| (i, i.to_string())).collect();
    for (i, (k, v)) in m.clone().into_iter().enumerate() {
        assert!(i == k);
        assert!(v == i.to_string());
    }
    let mut it = m.clone().into_iter();
    assert!(it.len() == n);
    assert!(it.next_back().map(|(k, _)| k) == Some(n - 1));
    assert!(m.clone().into_keys().eq(0..n));
    assert!(m.into_values().rev().next() == Some((n - 1).to_string()));
}

#[test]
fn exp_insert_fwd() {
    for _rep in 0..REP {
        let mut t = RbMap::<usize, usize>::default();
        let n = N;
        for i in 0..n {
            t.insert(i, i);
        }
        t.validate().unwrap();
        assert!(t.len() == n);
    }
}

#[test]
fn exp_insert_rev() {
    for _rep in 0..REP {
        let mut t = RbMap::<usize, usize>::default();
        let n = N;
        for i in (0..n).rev() {
            t.insert(i, i);
        }
        t.validate().unwrap();
        assert!(t.len() == n);
    }
}

#[test]
fn exp_remove_alternate() {
    let n = N;
    let mut t: RbMap<usize, usize> = (0..n).map(|i| (i, i)).collect();
    for i in (0..n).step_by(2) {
        assert!(t.remove(&i) == Some(i));
    }
    t.validate().unwrap();
    assert!(t.len() == n / 2);
    assert!(t.keys().all(|k| k % 2 == 1));
}

#[test]
fn random_ops_vs_std_test() {
    init_logging();
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let mut exp = RbMap::new();
    let mut smap = std::collections::BTreeMap::new();
    for step in 0..20000 {
        let k: u16 = rng.gen_range(0..500);
        match rng.gen_range(0..4) {
            0 | 1 => {
                let created = exp.insert(k, step).is_none();
                assert!(created == smap.insert(k, step).is_none());
            }
            2 => {
                assert!(exp.erase(&k) == usize::from(smap.remove(&k).is_some()));
                assert!(exp.find(&k).is_end());
            }
            _ => {
                let mut c = exp.lower_bound_mut(&k);
                let removed = c.remove_current();
                let expect = smap.range(k..).next().map(|(k, v)| (*k, *v));
                assert!(removed == expect);
                if let Some((rk, _)) = removed {
                    smap.remove(&rk);
                    let next = smap.range(rk..).next().map(|(k, _)| k);
                    assert!(c.key() == next);
                }
            }
        }
        if step % 97 == 0 {
            exp.validate().unwrap();
        }
        assert!(exp.len() == smap.len());
    }
    exp.validate().unwrap();
    assert!(exp.iter().eq(smap.iter()));
    assert!(exp.iter().rev().eq(smap.iter().rev()));
}

#[test]
fn erase_every_order_test() {
    // Every deletion case is reached by removing all keys of small trees in many orders.
    let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    for n in 1..40 {
        for _rep in 0..REP {
            let mut ks: Vec<u32> = (0..n).collect();
            ks.shuffle(&mut rng);
            let mut m: RbMap<u32, u32> = ks.iter().map(|&k| (k, k)).collect();
            m.validate().unwrap();
            ks.shuffle(&mut rng);
            for (i, k) in ks.iter().enumerate() {
                assert!(m.remove(k) == Some(*k));
                m.validate().unwrap();
                assert!(m.len() == ks.len() - i - 1);
                assert!(!m.contains_key(k));
            }
            assert!(m.cursor_front() == m.cursor_end());
        }
    }
}

#[test]
fn slot_reuse_test() {
    let mut m = RbMap::new();
    for round in 0..10 {
        for i in 0..100 {
            m.insert(i, round);
        }
        for i in (0..100).filter(|i| i % 3 != 0) {
            m.remove(&i);
        }
        m.validate().unwrap();
    }
    assert!(m.tree.nodes.slots() <= 100);
    assert!(m.len() == 34);
}

#[test]
fn validate_detects_test() {
    let mut m: RbMap<i32, i32> = (0..20).map(|i| (i, i)).collect();
    m.validate().unwrap();
    let r = m.tree.head.root.unwrap();
    m.tree.nodes.set_color(r, node::Color::Red);
    assert!(m.validate() == Err(InvariantError::RedRoot));
    m.tree.nodes.set_color(r, node::Color::Black);
    m.len += 1;
    assert!(matches!(m.validate(), Err(InvariantError::Length { .. })));
    m.len -= 1;
    m.tree.head.min = m.tree.head.max;
    assert!(m.validate() == Err(InvariantError::Extrema));
    assert!(InvariantError::Extrema.to_string() == "cached minimum or maximum is stale");
}

#[test]
fn traits_test() {
    let a = RbMap::from([(1, 1), (2, 2)]);
    let b = RbMap::from([(1, 1), (2, 3)]);
    assert!(a < b);
    assert!(a != b);
    assert!(format!("{a:?}") == "{1: 1, 2: 2}");
    let mut c: RbMap<i32, i32> = RbMap::new();
    c.extend([(2, 2)]);
    c.extend(a.iter().map(|(k, v)| (k, v)));
    assert!(c == a);

    use std::{collections::hash_map::RandomState, hash::BuildHasher};
    let s = RandomState::new();
    assert!(s.hash_one(&a) == s.hash_one(&c));
}

#[test]
fn iter_mut_debug_test() {
    init_logging();
    let mut m: RbMap<i32, i32> = (1..=4).map(|i| (i, i * 10)).collect();
    let mut it = m.iter_mut();
    assert!(format!("{it:?}") == "[(1, 10), (2, 20), (3, 30), (4, 40)]");
    it.next();
    it.next_back();
    assert!(format!("{it:?}") == "[(2, 20), (3, 30)]");
    let mut vals = m.values_mut();
    vals.next();
    assert!(format!("{vals:?}") == "[20, 30, 40]");
    assert!(format!("{:?}", m.iter()) == "[(1, 10), (2, 20), (3, 30), (4, 40)]");
}

#[test]
fn exp_mem_test() {
    let n = N * 10;
    let mut map = RbMap::new();
    for i in 0..n {
        map.insert(i as u32, 1u8);
    }
    println!("Done insertions");
    print_memory();
    println!("Required memory: {} bytes", n * 5);
}

#[test]
#[cfg(feature = "serde")]
fn exp_serde_test() {
    let n = N;
    let mut map = RbMap::new();
    for i in 0..n {
        map.insert(i as u32, 1u8);
    }
    for _i in 0..REP {
        let ser = bincode::serialize(&map).unwrap();
        let back: RbMap<u32, u8> = bincode::deserialize(&ser).unwrap();
        assert!(back == map);
        back.validate().unwrap();
    }
}
