// Reference model, a dense presence map over keys 0..capacity.
struct RefSet {
    entries: Vec<bool>,
}

impl RefSet {
    fn new(capacity: usize) -> RefSet {
        RefSet {
            entries: vec![false; capacity],
        }
    }

    fn len(&self) -> usize {
        self.entries.iter().filter(|x| **x).count()
    }

    fn contains(&self, key: i64) -> bool {
        self.entries[key as usize]
    }

    // return true if key was not present.
    fn insert(&mut self, key: i64) -> bool {
        let entry = &mut self.entries[key as usize];
        let ok = !*entry;
        *entry = true;
        ok
    }

    // return true if key was present.
    fn remove(&mut self, key: i64) -> bool {
        let entry = &mut self.entries[key as usize];
        let ok = *entry;
        *entry = false;
        ok
    }

    fn iter(&self) -> std::vec::IntoIter<i64> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(key, ok)| if *ok { Some(key as i64) } else { None })
            .collect::<Vec<i64>>()
            .into_iter()
    }

    fn reverse(&self) -> std::iter::Rev<std::vec::IntoIter<i64>> {
        self.iter().rev()
    }
}

fn make_seed() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

// AVL worst case height, in edges, for n entries.
fn avl_height_bound(n: usize) -> isize {
    (1.45 * ((n + 2) as f64).log2() - 1.0).floor() as isize
}
