// Progressive MP3 streaming: one download thread feeding one decode thread.

use futures_util::StreamExt;
use minimp3::{Decoder as Mp3Decoder, Error as Mp3Error, Frame};
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{channel, sync_channel, Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError};
use std::sync::Arc;
use std::time::Duration;

use crate::utils::errors::MediaError;

const CHUNK_POLL_INTERVAL: Duration = Duration::from_millis(200);

// Decoded frames buffered ahead of playback (~5 s of 44.1 kHz MP3)
const SAMPLE_QUEUE_FRAMES: usize = 192;
const SAMPLE_QUEUE_RETRY: Duration = Duration::from_millis(20);

/// Format of a stream, known once its first frame is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bitrate_kbps: u32,
    /// Bytes remaining from the requested offset, when the server reports it
    pub content_length: Option<u64>,
}

impl StreamInfo {
    /// Estimate playback length from size and bitrate (exact for CBR streams)
    pub fn estimated_duration(&self) -> Option<Duration> {
        let length = self.content_length?;
        if self.bitrate_kbps == 0 {
            return None;
        }
        let bytes_per_sec = f64::from(self.bitrate_kbps) * 1000.0 / 8.0;
        Some(Duration::from_secs_f64(length as f64 / bytes_per_sec))
    }

    /// Byte offset matching `position`, for ranged re-opens
    pub fn byte_offset(&self, position: Duration) -> u64 {
        let bytes_per_sec = u64::from(self.bitrate_kbps) * 1000 / 8;
        (position.as_secs_f64() * bytes_per_sec as f64) as u64
    }
}

/// Receiving side of a running stream
pub struct StreamPipe {
    pub samples: Receiver<Vec<i16>>,
    pub ready: Receiver<Result<StreamInfo, String>>,
    pub finished: Arc<AtomicBool>,
}

/// Start downloading `url` from `byte_offset` and decoding it.
///
/// The first message on `ready` is either the stream format (after the first
/// frame decoded) or the reason the stream could not be opened. Setting
/// `shutdown` stops both threads.
pub fn spawn_stream(url: String, byte_offset: u64, shutdown: Arc<AtomicBool>) -> StreamPipe {
    let (chunk_tx, chunk_rx) = channel::<Vec<u8>>();
    let (sample_tx, sample_rx) = sync_channel::<Vec<i16>>(SAMPLE_QUEUE_FRAMES);
    let (ready_tx, ready_rx) = channel::<Result<StreamInfo, String>>();
    let finished = Arc::new(AtomicBool::new(false));
    let content_length = Arc::new(AtomicU64::new(0));

    {
        let ready_tx = ready_tx.clone();
        let shutdown = Arc::clone(&shutdown);
        let content_length = Arc::clone(&content_length);
        std::thread::spawn(move || {
            let rt = match crate::utils::error_handling::create_runtime() {
                Ok(r) => r,
                Err(e) => {
                    log::error!("[Streaming] Failed to create runtime: {}", e);
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            if let Err(e) = rt.block_on(download(&url, byte_offset, chunk_tx, content_length, shutdown)) {
                log::error!("[Streaming] Download error: {}", e);
                let _ = ready_tx.send(Err(e.to_string()));
            }
        });
    }

    {
        let finished = Arc::clone(&finished);
        std::thread::spawn(move || {
            let reader = ChunkReader::new(chunk_rx, Arc::clone(&shutdown));
            decode(reader, sample_tx, ready_tx, &content_length, &shutdown);
            finished.store(true, Ordering::Relaxed);
        });
    }

    StreamPipe {
        samples: sample_rx,
        ready: ready_rx,
        finished,
    }
}

/// Stream the body of `url` (optionally ranged) into `chunk_tx`
async fn download(
    url: &str,
    byte_offset: u64,
    chunk_tx: Sender<Vec<u8>>,
    content_length: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
) -> Result<(), MediaError> {
    let client = crate::utils::http::client();
    let mut req = client.get(url);
    if byte_offset > 0 {
        req = req.header("Range", format!("bytes={}-", byte_offset));
    }
    let resp = req.send().await.map_err(|e| MediaError::Open(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(MediaError::Open(format!("server returned status {}", status)));
    }
    if byte_offset > 0 && status.as_u16() != 206 {
        log::warn!("[Streaming] Server ignored Range request, playing from the start");
    }

    if let Some(len) = resp.content_length() {
        content_length.store(len, Ordering::Relaxed);
        log::info!("[Streaming] Expected size: {} KB", len / 1024);
    } else {
        log::warn!("[Streaming] No Content-Length header - duration will be unknown");
    }

    let mut total_downloaded: usize = 0;
    let mut stream = resp.bytes_stream();

    while let Some(item) = stream.next().await {
        if shutdown.load(Ordering::Relaxed) {
            log::debug!("[Streaming] Shutdown requested after {} KB", total_downloaded / 1024);
            return Ok(());
        }
        match item {
            Ok(chunk) => {
                total_downloaded += chunk.len();
                if chunk_tx.send(chunk.to_vec()).is_err() {
                    // decoder is gone, nothing left to feed
                    return Ok(());
                }
            }
            Err(e) => {
                log::warn!("[Streaming] Stream error after {} KB: {}", total_downloaded / 1024, e);
                break;
            }
        }
    }

    log::info!("[Streaming] Download complete: {} KB", total_downloaded / 1024);
    Ok(())
}

fn decode<R: Read>(
    reader: R,
    sample_tx: SyncSender<Vec<i16>>,
    ready_tx: Sender<Result<StreamInfo, String>>,
    content_length: &AtomicU64,
    shutdown: &AtomicBool,
) {
    let mut decoder = Mp3Decoder::new(reader);
    let mut announced = false;
    let mut frames: usize = 0;

    while !shutdown.load(Ordering::Relaxed) {
        match decoder.next_frame() {
            Ok(Frame {
                data,
                sample_rate,
                channels,
                bitrate,
                ..
            }) => {
                if !announced {
                    let info = StreamInfo {
                        sample_rate: u32::try_from(sample_rate).unwrap_or(44_100),
                        channels: u16::try_from(channels).unwrap_or(2),
                        bitrate_kbps: u32::try_from(bitrate).unwrap_or(0),
                        content_length: match content_length.load(Ordering::Relaxed) {
                            0 => None,
                            len => Some(len),
                        },
                    };
                    log::info!(
                        "[Streaming] First frame: {} Hz, {} ch, {} kbps",
                        info.sample_rate,
                        info.channels,
                        info.bitrate_kbps
                    );
                    let _ = ready_tx.send(Ok(info));
                    announced = true;
                }
                if !push_frame(&sample_tx, data, shutdown) {
                    log::debug!("[Streaming] Playback stopped after {} frames", frames);
                    return;
                }
                frames += 1;
            }
            Err(Mp3Error::SkippedData) => continue,
            Err(Mp3Error::Eof) | Err(Mp3Error::InsufficientData) => break,
            Err(Mp3Error::Io(e)) => {
                log::warn!("[Streaming] Decode read error: {}", e);
                break;
            }
        }
    }

    if !announced {
        let _ = ready_tx.send(Err("stream contained no playable MP3 frames".to_string()));
    }
    log::debug!("[Streaming] Decoder finished after {} frames", frames);
}

/// Queue one decoded frame, waiting while the queue is full.
/// Returns false once playback is gone or shutdown was requested.
fn push_frame(sample_tx: &SyncSender<Vec<i16>>, mut frame: Vec<i16>, shutdown: &AtomicBool) -> bool {
    loop {
        match sample_tx.try_send(frame) {
            Ok(()) => return true,
            Err(TrySendError::Disconnected(_)) => return false,
            Err(TrySendError::Full(pending)) => {
                if shutdown.load(Ordering::Relaxed) {
                    return false;
                }
                frame = pending;
                std::thread::sleep(SAMPLE_QUEUE_RETRY);
            }
        }
    }
}

/// Blocking `Read` over byte chunks arriving from the download thread
struct ChunkReader {
    rx: Receiver<Vec<u8>>,
    chunk: Vec<u8>,
    pos: usize,
    shutdown: Arc<AtomicBool>,
}

impl ChunkReader {
    fn new(rx: Receiver<Vec<u8>>, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            rx,
            chunk: Vec::new(),
            pos: 0,
            shutdown,
        }
    }
}

impl Read for ChunkReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos >= self.chunk.len() {
            if self.shutdown.load(Ordering::Relaxed) {
                return Ok(0);
            }
            match self.rx.recv_timeout(CHUNK_POLL_INTERVAL) {
                Ok(chunk) => {
                    self.chunk = chunk;
                    self.pos = 0;
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Ok(0),
            }
        }

        let n = buf.len().min(self.chunk.len() - self.pos);
        buf[..n].copy_from_slice(&self.chunk[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
