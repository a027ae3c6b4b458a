//! Bounded synchronous channel between a CPU core and a memory service.
//!
//! The CPU thread holds a [`BusClient`], which implements [`Memory`]. The
//! peripheral thread runs a [`BusServer`] that owns the real memory. Both
//! directions use capacity-1 channels and every request, writes included,
//! waits for its response, so at most one access is ever in flight.
//!
//! ```
//! use emu_core::{FlatMemory, Memory, bus};
//!
//! let (mut client, server) = bus::channel(FlatMemory::new());
//! let worker = std::thread::spawn(move || server.serve());
//! client.write_word(0x4000, 0xBEEF);
//! assert_eq!(client.read_byte(0x4000), 0xBE);
//! drop(client);
//! let mut memory = worker.join().unwrap();
//! assert_eq!(memory.read_word(0x4000), 0xBEEF);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender, sync_channel};
use std::time::Duration;

use crate::Memory;

/// How long the server blocks on an empty channel before re-checking quit.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Value a disconnected client returns for reads.
const OPEN_BUS: u8 = 0xFF;

/// A single memory access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ReadByte(u16),
    ReadWord(u16),
    WriteByte(u16, u8),
    WriteWord(u16, u16),
    Load(u16, Vec<u8>),
}

/// The answer to a [`Request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Byte(u8),
    Word(u16),
    /// Acknowledges a write or load.
    Done,
}

/// Shared cooperative shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct QuitHandle(Arc<AtomicBool>);

impl QuitHandle {
    /// Ask the server to stop at its next poll.
    pub fn quit(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// CPU side of the channel.
#[derive(Debug)]
pub struct BusClient {
    requests: SyncSender<Request>,
    responses: Receiver<Response>,
}

impl BusClient {
    fn transact(&self, request: Request) -> Option<Response> {
        if self.requests.send(request).is_err() {
            log::error!("memory service has gone away");
            return None;
        }
        match self.responses.recv() {
            Ok(response) => Some(response),
            Err(_) => {
                log::error!("memory service dropped the response channel");
                None
            }
        }
    }
}

impl Memory for BusClient {
    fn read_byte(&mut self, address: u16) -> u8 {
        match self.transact(Request::ReadByte(address)) {
            Some(Response::Byte(value)) => value,
            _ => OPEN_BUS,
        }
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        self.transact(Request::WriteByte(address, value));
    }

    fn read_word(&mut self, address: u16) -> u16 {
        match self.transact(Request::ReadWord(address)) {
            Some(Response::Word(value)) => value,
            _ => u16::from_be_bytes([OPEN_BUS, OPEN_BUS]),
        }
    }

    fn write_word(&mut self, address: u16, value: u16) {
        self.transact(Request::WriteWord(address, value));
    }

    fn load(&mut self, address: u16, data: &[u8]) {
        self.transact(Request::Load(address, data.to_vec()));
    }
}

/// Memory-service side of the channel.
#[derive(Debug)]
pub struct BusServer<M> {
    memory: M,
    requests: Receiver<Request>,
    responses: SyncSender<Response>,
    quit: QuitHandle,
    poll_interval: Duration,
}

impl<M: Memory> BusServer<M> {
    /// Handle that stops [`BusServer::serve`] from another thread.
    #[must_use]
    pub fn quit_handle(&self) -> QuitHandle {
        self.quit.clone()
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Answer requests until quit is requested or the client disconnects.
    ///
    /// Empty polls are not errors; the loop just checks the quit flag and
    /// waits again. Returns the memory so its final contents can be checked.
    pub fn serve(mut self) -> M {
        while !self.quit.is_set() {
            let request = match self.requests.recv_timeout(self.poll_interval) {
                Ok(request) => request,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    log::debug!("bus client disconnected");
                    break;
                }
            };
            let response = self.handle(request);
            if self.responses.send(response).is_err() {
                break;
            }
        }
        self.memory
    }

    fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::ReadByte(addr) => Response::Byte(self.memory.read_byte(addr)),
            Request::ReadWord(addr) => Response::Word(self.memory.read_word(addr)),
            Request::WriteByte(addr, value) => {
                self.memory.write_byte(addr, value);
                Response::Done
            }
            Request::WriteWord(addr, value) => {
                self.memory.write_word(addr, value);
                Response::Done
            }
            Request::Load(addr, data) => {
                self.memory.load(addr, &data);
                Response::Done
            }
        }
    }
}

/// Connect `memory` to a new client/server pair.
pub fn channel<M: Memory>(memory: M) -> (BusClient, BusServer<M>) {
    let (request_tx, request_rx) = sync_channel(1);
    let (response_tx, response_rx) = sync_channel(1);
    let client = BusClient {
        requests: request_tx,
        responses: response_rx,
    };
    let server = BusServer {
        memory,
        requests: request_rx,
        responses: response_tx,
        quit: QuitHandle::default(),
        poll_interval: DEFAULT_POLL_INTERVAL,
    };
    (client, server)
}
