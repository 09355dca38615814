use crate::Distributor;
use crate::sync::{Arc, AtomicBool, Ordering, thread};
use std::sync::atomic::AtomicUsize;
use std::time::Duration;
use itertools::assert_equal;
use super::common::*;
use super::utils::Recorder;

#[test]
fn mt_read_test() {
    for _ in 0..10{
        mt_read_test_impl(4, 10000);
    }
}

#[test]
fn mt_write_read_test() {
    for _ in 0..10{
        let queue_size = 10000;
        let readers_thread_count = 4;
        let distributor = Distributor::<[usize;4]>::new();

        let mut readers = Vec::new();
        for _ in 0..readers_thread_count{
            readers.push(distributor.subscribe());
        }

        // etalon
        let sum0: usize = (0..queue_size).map(|i|i+0).sum();
        let sum3: usize = (0..queue_size).map(|i|i+3).sum();

        // write
        let writer = distributor.clone();
        let writer_thread = thread::spawn(move || {
            for i in 0..queue_size{
                writer.submit([i, i+1, i+2, i+3]);
            }
        });

        // read
        let readers_stop = Arc::new(AtomicBool::new(false));
        let mut reader_threads = Vec::new();
        for mut reader in readers{
            let readers_stop = readers_stop.clone();
            let thread = thread::spawn(move || {
                let mut local_sum0: usize = 0;
                let mut local_sum3: usize = 0;
                let mut next_expected = 0;

                // do-while ensures that reader will try another round after stop,
                // to consume leftovers.
                loop{
                    let stop = readers_stop.load(Ordering::Acquire);

                    for [i0, _, _, i3] in reader.try_iter(){
                        assert_eq!(i0, next_expected);
                        next_expected += 1;
                        local_sum0 += i0;
                        local_sum3 += i3;
                    }

                    if stop{ break; }
                    reader.wait_chan().wait_timeout(Duration::from_millis(1));
                }

                assert_eq!(local_sum0, sum0);
                assert_eq!(local_sum3, sum3);
            });
            reader_threads.push(thread);
        }

        writer_thread.join().unwrap();
        readers_stop.store(true, Ordering::Release);
        for thread in reader_threads {
            thread.join().unwrap();
        }
        assert!(distributor.is_empty());
    }
}

#[test]
fn mt_blocking_recv_wakes_all_test() {
    let distributor = Distributor::<usize>::new();
    let woken = Arc::new(AtomicUsize::new(0));

    let threads: Vec<_> = (0..8).map(|_|{
        let mut reader = distributor.subscribe();
        let woken = woken.clone();
        thread::spawn(move || {
            let value = reader.recv();
            woken.fetch_add(1, Ordering::AcqRel);
            value
        })
    }).collect();

    // all readers subscribed before this point, so all see it
    thread::sleep(Duration::from_millis(20));
    distributor.submit(42);

    for thread in threads{
        assert_eq!(thread.join().unwrap(), 42);
    }
    assert_eq!(woken.load(Ordering::Acquire), 8);
    assert!(distributor.is_empty());
}

#[test]
fn mt_readers_leave_early_test() {
    let recorder = Recorder::<usize>::new();
    let distributor = Distributor::with_options([recorder.options()]);
    let len = 5000;

    let threads: Vec<_> = (0..4).map(|n|{
        let mut reader = distributor.subscribe();
        // reader n leaves after (n+1)/4 of the stream
        let quota = len * (n + 1) / 4;
        thread::spawn(move || {
            let received: Vec<usize> = (0..quota).map(|_| reader.recv()).collect();
            reader.unsubscribe();
            received
        })
    }).collect();

    for i in 0..len{
        distributor.submit(i);
    }

    for (n, thread) in threads.into_iter().enumerate(){
        assert_equal(thread.join().unwrap(), 0..len * (n + 1) / 4);
    }

    assert!(distributor.is_empty());
    assert_equal(recorder.consumed(), 0..len);
}
