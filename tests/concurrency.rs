use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use rayon::prelude::*;
use syncvec::Vector;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[test]
fn concurrent_appends_lose_nothing() {
    init_tracing();
    let v = Arc::new(Vector::new());
    let threads = 8;
    let per_thread = 1_000;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let v = Arc::clone(&v);
            thread::spawn(move || {
                for i in 0..per_thread {
                    v.append(t * per_thread + i);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut items = v.to_vec();
    items.sort_unstable();
    let expected: Vec<i64> = (0..threads * per_thread).collect();
    assert_eq!(items, expected);
    assert!(v.capacity() >= items.len());
}

#[test]
fn parallel_appends_with_rayon() {
    let v = Vector::new();
    (0..1_000i64).into_par_iter().for_each(|i| v.append(i));

    assert_eq!(v.len(), 1_000);
    assert_eq!(v.reduce(|a, b| a + b), (0..1_000i64).sum::<i64>());
}

#[test]
fn readers_never_see_capacity_below_len() {
    let v = Vector::with_capacity(1, 2);
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..2_000 {
                v.append(i);
                if i % 7 == 0 {
                    let _ = v.remove(0);
                }
                if i % 500 == 0 {
                    v.clear();
                }
            }
            done.store(true, Ordering::Release);
        });

        for _ in 0..4 {
            s.spawn(|| {
                let mut last_capacity = 0;
                while !done.load(Ordering::Acquire) {
                    let snapshot = v.snapshot();
                    assert!(snapshot.capacity >= snapshot.items.len());
                    assert!(snapshot.capacity >= last_capacity);
                    last_capacity = snapshot.capacity;
                }
            });
        }
    });
}

#[test]
fn cross_vector_reads_do_not_deadlock() {
    let a = Vector::from_items(&[1, 2, 3, 4]);
    let b = Vector::from_items(&[4, 3, 2, 1]);

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..1_000 {
                assert!(a.inner_product(&b).is_ok());
            }
        });
        s.spawn(|| {
            for _ in 0..1_000 {
                assert!(b.inner_product(&a).is_ok());
                let _ = b.equal(&a);
            }
        });
        s.spawn(|| {
            for i in 0..1_000 {
                a.set(i % 4, i as i64).unwrap();
                b.set(3 - i % 4, i as i64).unwrap();
            }
        });
    });

    assert_eq!(a.len(), 4);
    assert_eq!(b.len(), 4);
}

#[test]
fn inner_product_sees_consistent_lengths() {
    let a = Vector::from_items(&[1, 1]);
    let b = Vector::from_items(&[1, 1]);

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..500 {
                b.append(1);
                b.remove(b.len() - 1).unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..500 {
                match a.inner_product(&b) {
                    Ok(sum) => assert_eq!(sum, 2),
                    Err(err) => assert_eq!(
                        err,
                        syncvec::VectorError::SizeMismatch { left: 2, right: 3 }
                    ),
                }
            }
        });
    });
}

#[test]
fn clones_taken_under_load_are_independent() {
    let v = Vector::from_items(&[0; 5]);
    let clones: Vec<Vector> = thread::scope(|s| {
        s.spawn(|| {
            for i in 0..200 {
                v.append(i);
            }
        });
        let cloner = s.spawn(|| (0..50).map(|_| v.clone()).collect::<Vec<_>>());
        cloner.join().unwrap()
    });

    let final_len = v.len();
    for clone in &clones {
        assert!(clone.len() <= final_len);
        assert!(clone.capacity() >= clone.len());
        clone.clear();
    }
    assert_eq!(v.len(), final_len);
}
