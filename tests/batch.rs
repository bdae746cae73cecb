use batchget::{Batch, ConsoleReporter};
use std::{
    collections::HashSet,
    io::{self, Write},
    sync::{Arc, Mutex},
    time::Duration,
};
use testserver::{Mock, Response};

mod utils;

use utils::Recorder;

fn payload_server(failing: &'static [usize]) -> Mock {
    Mock::data(move |index| {
        if failing.contains(&index) {
            Response::status(500)
        } else {
            Response::ok(format!("payload {}", index))
        }
    })
}

fn batch_for(m: &Mock, recorder: &Arc<Recorder>) -> Batch {
    Batch::builder()
        .template(m.template())
        .source(utils::http_source(Duration::from_secs(30)))
        .reporter(recorder.clone())
        .build()
        .unwrap()
}

#[test]
fn every_target_succeeds() {
    utils::logging();

    let m = payload_server(&[]);
    let recorder = Arc::new(Recorder::default());
    let batch = batch_for(&m, &recorder);

    assert_eq!(batch.run(10), 10);

    let bodies = batch.cache().snapshot().into_iter().collect::<HashSet<_>>();
    let expected = (0..10).map(|i| format!("payload {}", i)).collect::<HashSet<_>>();
    assert_eq!(bodies, expected);

    let paths = m.requests().into_iter().map(|r| r.url).collect::<HashSet<_>>();
    let expected = (0..10).map(|i| format!("/data/{}", i)).collect::<HashSet<_>>();
    assert_eq!(paths, expected);

    assert!(m.requests().iter().all(|r| r.method == "GET"));
    assert!(recorder.failures().is_empty());
}

#[test]
fn every_target_fails() {
    utils::logging();

    let m = payload_server(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    let recorder = Arc::new(Recorder::default());
    let batch = batch_for(&m, &recorder);

    assert_eq!(batch.run(10), 0);
    assert!(batch.cache().is_empty());

    let failures = recorder.failures();
    assert_eq!(failures.len(), 10);
    assert!(failures.iter().all(|f| f.status.map(|s| s.as_u16()) == Some(500)));
    assert_eq!(recorder.summary().failed, 10);
}

#[test]
fn failing_targets_do_not_affect_the_others() {
    utils::logging();

    let m = payload_server(&[2, 5, 7]);
    let recorder = Arc::new(Recorder::default());
    let batch = batch_for(&m, &recorder);

    assert_eq!(batch.run(10), 7);
    assert_eq!(m.requests_received(), 10);

    assert_eq!(
        recorder.failed_urls(),
        vec![
            format!("http://{}/data/2", m.addr()),
            format!("http://{}/data/5", m.addr()),
            format!("http://{}/data/7", m.addr()),
        ]
    );

    let bodies = batch.cache().snapshot().into_iter().collect::<HashSet<_>>();
    for i in [0, 1, 3, 4, 6, 8, 9] {
        assert!(bodies.contains(&format!("payload {}", i)));
    }
}

#[test]
fn empty_batch_sends_no_requests() {
    let m = payload_server(&[]);
    let recorder = Arc::new(Recorder::default());

    assert_eq!(batch_for(&m, &recorder).run(0), 0);
    assert_eq!(m.requests_received(), 0);
    assert_eq!(recorder.summary().requested, 0);
}

#[test]
fn hundreds_of_concurrent_fetches_are_all_collected() {
    utils::logging();

    let m = payload_server(&[]);
    let recorder = Arc::new(Recorder::default());
    let batch = batch_for(&m, &recorder);

    assert_eq!(batch.run(150), 150);

    let unique = batch.cache().snapshot().into_iter().collect::<HashSet<_>>();
    assert_eq!(unique.len(), 150);
    assert_eq!(m.requests_received(), 150);
}

#[test]
fn consecutive_batches_against_one_server_all_complete() {
    utils::logging();

    let m = payload_server(&[]);
    let recorder = Arc::new(Recorder::default());
    let batch = batch_for(&m, &recorder);

    for run in 1..=3 {
        assert_eq!(batch.run(50), 50 * run);
        assert_eq!(recorder.summary().succeeded, 50);
    }

    assert_eq!(m.requests_received(), 150);
}

#[test]
fn unrouted_paths_fail_with_not_found() {
    let m = payload_server(&[]);
    let recorder = Arc::new(Recorder::default());

    let batch = Batch::builder()
        .template(format!("http://{}/missing/{{index}}", m.addr()))
        .source(utils::http_source(Duration::from_secs(30)))
        .reporter(recorder.clone())
        .build()
        .unwrap();

    assert_eq!(batch.run(2), 0);
    assert!(recorder
        .failures()
        .iter()
        .all(|f| f.status.map(|s| s.as_u16()) == Some(404)));
}

#[derive(Clone, Default)]
struct Lines(Arc<Mutex<Vec<u8>>>);

impl Lines {
    fn get(&self) -> Vec<String> {
        String::from_utf8(self.0.lock().unwrap().clone())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl Write for Lines {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn console_output_has_one_error_line_per_failure() {
    let m = payload_server(&[2, 5, 7]);
    let out = Lines::default();
    let err = Lines::default();

    let batch = Batch::builder()
        .template(m.template())
        .source(utils::http_source(Duration::from_secs(30)))
        .reporter(ConsoleReporter::with_writers(out.clone(), err.clone()))
        .build()
        .unwrap();

    assert_eq!(batch.run(10), 7);

    assert_eq!(
        out.get(),
        vec!["Fetches started: 10 targets", "All fetches finished, cache size: 7"]
    );

    let mut errors = err.get();
    errors.sort();

    assert_eq!(errors.len(), 3);
    for (line, index) in errors.iter().zip([2, 5, 7]) {
        assert!(
            line.starts_with(&format!("error fetching http://{}/data/{}: ", m.addr(), index)),
            "unexpected error line: {}",
            line
        );
        assert!(line.contains("500"), "unexpected error line: {}", line);
    }
}
