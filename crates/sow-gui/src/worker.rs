//! Background jobs for library calls and image encoding
//!
//! One job at a time per panel: the panel keeps the [`Job`] while it runs and
//! disables the buttons that would start another.

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

use eframe::egui;
use sow_types::{Error, Result};

pub struct Job<T> {
    receiver: Receiver<Result<T>>,
}

impl<T: Send + 'static> Job<T> {
    /// Run `work` on a new thread and repaint when it finishes
    pub fn spawn(ctx: &egui::Context, work: impl FnOnce() -> Result<T> + Send + 'static) -> Self {
        let (sender, receiver) = channel();
        let ctx = ctx.clone();
        thread::spawn(move || {
            let _ = sender.send(work());
            ctx.request_repaint();
        });
        Self { receiver }
    }

    /// The outcome once the thread is done
    pub fn poll(&self) -> Option<Result<T>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(Error::Storage(
                "a tarefa em segundo plano terminou inesperadamente".to_string(),
            ))),
        }
    }
}
