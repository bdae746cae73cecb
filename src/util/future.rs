//! Tiny module containing utilities for working with futures.

use crossbeam_utils::sync::Parker;
use futures_lite::pin;
use std::{
    cell::RefCell,
    future::Future,
    task::{Context, Poll, Waker},
};
use waker_fn::waker_fn;

pub(crate) trait FutureExt: Future {
    /// Block the current thread until this future completes.
    fn wait(self) -> <Self as Future>::Output
    where
        Self: Sized,
    {
        fn create_parker() -> (Parker, Waker) {
            let parker = Parker::new();
            let unparker = parker.unparker().clone();
            let waker = waker_fn(move || unparker.unpark());

            (parker, waker)
        }

        thread_local! {
            static PARKER: RefCell<(Parker, Waker)> = RefCell::new(create_parker());
        }

        let future = self;
        pin!(future);

        PARKER.with(|cell| {
            // Nested `wait()` calls on the same thread get a parker of their
            // own.
            if let Ok(borrow) = cell.try_borrow_mut() {
                let mut cx = Context::from_waker(&borrow.1);

                loop {
                    match future.as_mut().poll(&mut cx) {
                        Poll::Ready(result) => break result,
                        Poll::Pending => borrow.0.park(),
                    }
                }
            } else {
                let (parker, waker) = create_parker();
                let mut cx = Context::from_waker(&waker);

                loop {
                    match future.as_mut().poll(&mut cx) {
                        Poll::Ready(result) => break result,
                        Poll::Pending => parker.park(),
                    }
                }
            }
        })
    }
}

impl<F: Future> FutureExt for F {}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::future;
    use std::{sync::Arc, thread, time::Duration};

    #[test]
    fn wait_returns_output() {
        assert_eq!(future::ready(42).wait(), 42);
    }

    #[test]
    fn wait_is_woken_from_another_thread() {
        let (sender, receiver) = std::sync::mpsc::channel();
        let waker_slot: Arc<std::sync::Mutex<Option<Waker>>> = Default::default();

        let handle = {
            let waker_slot = waker_slot.clone();
            thread::spawn(move || loop {
                if let Some(waker) = waker_slot.lock().unwrap().take() {
                    thread::sleep(Duration::from_millis(10));
                    sender.send(()).unwrap();
                    waker.wake();
                    break;
                }
                thread::yield_now();
            })
        };

        let result = future::poll_fn(|cx| match receiver.try_recv() {
            Ok(()) => Poll::Ready("done"),
            Err(_) => {
                *waker_slot.lock().unwrap() = Some(cx.waker().clone());
                Poll::Pending
            }
        })
        .wait();

        assert_eq!(result, "done");
        handle.join().unwrap();
    }
}
