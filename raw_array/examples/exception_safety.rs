use raw_array::RawArray;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Tracked(usize, Arc<AtomicUsize>);

impl Drop for Tracked {
    fn drop(&mut self) {
        println!("Dropping element {}", self.0);
        self.1.fetch_add(1, Ordering::SeqCst);
    }
}

fn main() {
    println!("--- Gap Insert Rollback Example ---");
    let drop_count = Arc::new(AtomicUsize::new(0));

    {
        let mut arr = RawArray::try_with_capacity(6).expect("allocation failed");
        for i in 0..3 {
            let _ = arr.push_within_capacity(Tracked(i, drop_count.clone()));
        }

        let made = arr.insert_with(
            1,
            3,
            |k| {
                if k < 2 {
                    Ok(Tracked(100 + k, drop_count.clone()))
                } else {
                    Err("third element refused")
                }
            },
            drop,
        );
        println!("Insert result: {:?}, len after rollback: {}", made.err(), arr.len());
        assert_eq!(arr.len(), 3);
        assert_eq!(drop_count.load(Ordering::SeqCst), 2);
    }

    println!("Total elements dropped: {}", drop_count.load(Ordering::SeqCst));
    assert_eq!(drop_count.load(Ordering::SeqCst), 5);
}
