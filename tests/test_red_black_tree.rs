extern crate balanced_collections;
extern crate rand;

use self::rand::{thread_rng, Rng};
use balanced_collections::red_black_tree::{Error, RedBlackMap};
use std::collections::BTreeMap;
use std::vec::Vec;

#[test]
fn int_test_red_black_map() {
    let mut rng: rand::XorShiftRng = rand::SeedableRng::from_seed([1, 1, 1, 1]);
    let mut map = RedBlackMap::new();
    let mut expected: BTreeMap<u32, u32> = BTreeMap::new();

    for _ in 0..100_000 {
        let key = rng.gen_range(0, 10_000);
        let val = rng.gen::<u32>();

        match rng.gen_range(0, 3) {
            0 => {
                map.set(key, val);
                expected.insert(key, val);
            }
            1 => {
                let removed = map.remove(&key);
                match expected.remove(&key) {
                    Some(expected_val) => assert_eq!(removed, Ok((key, expected_val))),
                    None => assert_eq!(removed, Err(Error::KeyNotFound(key))),
                }
            }
            _ => {
                assert_eq!(map.is_set(&key), expected.contains_key(&key));
                match expected.get(&key) {
                    Some(expected_val) => assert_eq!(map.get(&key), Ok(expected_val)),
                    None => assert_eq!(map.get(&key), Err(Error::KeyNotFound(key))),
                }
            }
        }

        assert_eq!(map.len(), expected.len());
        assert_eq!(map.min(), expected.keys().next());
        assert_eq!(map.max(), expected.keys().next_back());
    }

    let mut keys: Vec<u32> = expected.keys().cloned().collect();
    thread_rng().shuffle(&mut keys);

    let mut expected_len = expected.len();
    for key in keys {
        let expected_val = expected.remove(&key).unwrap();
        assert_eq!(map.remove(&key), Ok((key, expected_val)));
        expected_len -= 1;
        assert_eq!(map.len(), expected_len);
    }
    assert!(map.is_empty());
}

#[test]
fn int_test_driver_scenario() {
    let mut map = RedBlackMap::new();
    map.set(1, 1);
    map.set(-2, -2);
    map.set(3, 3);
    map.set(-5, -5);
    map.set(-9, -9);

    map.set(1, 1);
    assert_eq!(map.get(&-2), Ok(&-2));
    assert_eq!(map[&-2], -2);

    let error = map.get(&44).unwrap_err();
    assert_eq!(error, Error::KeyNotFound(44));
    assert_eq!(error.key(), &44);

    assert!(map.is_set(&-5));
    assert!(!map.is_set(&565));
    assert_eq!(map.len(), 5);
}
