use crate::Distributor;
use crate::sync::thread;
use itertools::assert_equal;

pub(crate) fn mt_read_test_impl(readers_count: usize, len: usize) {
    let distributor = Distributor::<usize>::new();

    let mut readers = Vec::new();
    for _ in 0..readers_count{
        readers.push(distributor.subscribe());
    }

    // read
    let mut threads = Vec::new();
    for mut reader in readers{
        let thread = thread::spawn(move || {
            let mut received = Vec::with_capacity(len);
            for _ in 0..len{
                received.push(reader.recv());
            }
            received
        });
        threads.push(thread);
    }

    // write
    for i in 0..len{
        distributor.submit(i);
    }

    for thread in threads{
        assert_equal(thread.join().unwrap(), 0..len);
    }

    // readers dropped inside their threads
    assert!(distributor.is_empty());
}
