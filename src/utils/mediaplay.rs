use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::constants::STREAM_STALL_TIMEOUT_SECS;
use crate::utils::errors::MediaError;
use crate::utils::media::core::{spawn_stream, StreamInfo, StreamPipe};
use crate::utils::media::MediaHandle;

const STREAM_CLOSED: &str = "stream closed before audio arrived";

/// Rodio-backed media handle streaming one HTTP MP3 source at a time.
///
/// Lives on the UI thread (the output stream is not `Send`); all network and
/// decode work happens on the threads spawned per opened stream.
pub struct StreamPlayer {
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
    source_url: Option<String>,
    stream_info: Option<StreamInfo>,
    total_duration: Option<Duration>,
    shutdown: Arc<AtomicBool>,
    // Real (non-silence) samples handed to the output by the current source
    played: Arc<AtomicU64>,
    pending_seek: Option<PendingSeek>,
    prepare_timeout: Duration,
    start_position: Duration,
    playing: bool,
    started: bool,
}

/// Ranged re-open waiting for its first frame
struct PendingSeek {
    pipe: StreamPipe,
    shutdown: Arc<AtomicBool>,
    position: Duration,
    requested_at: Instant,
}

/// Progressive streaming source that plays decoded frames as they arrive
struct StreamingSource {
    sample_rx: Receiver<Vec<i16>>,
    current_samples: Vec<i16>,
    sample_index: usize,
    sample_rate: u32,
    channels: u16,
    finished: Arc<AtomicBool>,
    played: Arc<AtomicU64>,
    last_sample_time: Instant,
}

impl StreamingSource {
    fn new(
        sample_rx: Receiver<Vec<i16>>,
        info: StreamInfo,
        finished: Arc<AtomicBool>,
        played: Arc<AtomicU64>,
    ) -> Self {
        Self {
            sample_rx,
            current_samples: Vec::new(),
            sample_index: 0,
            sample_rate: info.sample_rate,
            channels: info.channels,
            finished,
            played,
            last_sample_time: Instant::now(),
        }
    }
}

impl Iterator for StreamingSource {
    type Item = i16;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.sample_index < self.current_samples.len() {
                let sample = self.current_samples[self.sample_index];
                self.sample_index += 1;
                self.played.fetch_add(1, Ordering::Relaxed);
                return Some(sample);
            }

            match self.sample_rx.try_recv() {
                Ok(samples) => {
                    self.current_samples = samples;
                    self.sample_index = 0;
                    self.last_sample_time = Instant::now();
                }
                Err(_) => {
                    if self.finished.load(Ordering::Relaxed) {
                        // decoder done and every frame played
                        return None;
                    }
                    if self.last_sample_time.elapsed() > Duration::from_secs(STREAM_STALL_TIMEOUT_SECS) {
                        log::error!("[StreamingSource] Stream stalled - ending playback");
                        self.finished.store(true, Ordering::Relaxed);
                        return None;
                    }
                    // Yield silence while waiting for more data
                    return Some(0);
                }
            }
        }
    }
}

impl Source for StreamingSource {
    fn current_frame_len(&self) -> Option<usize> {
        None // Unknown for streaming
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None // Unknown for streaming
    }
}

/// Map the first message on a stream's ready channel to its format or an error
fn ready_outcome(message: Result<Result<StreamInfo, String>, RecvTimeoutError>, timeout: Duration) -> Result<StreamInfo, MediaError> {
    match message {
        Ok(Ok(info)) => Ok(info),
        Ok(Err(e)) => Err(MediaError::Open(e)),
        Err(RecvTimeoutError::Timeout) => Err(MediaError::Timeout(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(MediaError::Open(STREAM_CLOSED.to_string())),
    }
}

impl StreamPlayer {
    pub fn new(prepare_timeout: Duration) -> Self {
        Self {
            output: None,
            sink: None,
            source_url: None,
            stream_info: None,
            total_duration: None,
            shutdown: Arc::new(AtomicBool::new(false)),
            played: Arc::new(AtomicU64::new(0)),
            pending_seek: None,
            prepare_timeout,
            start_position: Duration::ZERO,
            playing: false,
            started: false,
        }
    }

    /// Open the audio device on first use
    fn ensure_output(&mut self) -> Result<&OutputStreamHandle, MediaError> {
        if self.output.is_none() {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| MediaError::Output(e.to_string()))?;
            log::info!("[AudioPlayer] Audio output opened");
            self.output = Some((stream, handle));
        }
        match &self.output {
            Some((_, handle)) => Ok(handle),
            None => Err(MediaError::Output("no output stream".to_string())),
        }
    }

    fn open_pipe(url: &str, byte_offset: u64) -> (StreamPipe, Arc<AtomicBool>) {
        let shutdown = Arc::new(AtomicBool::new(false));
        let pipe = spawn_stream(url.to_string(), byte_offset, Arc::clone(&shutdown));
        (pipe, shutdown)
    }

    /// Swap a ready stream in for the current one, keeping the play/pause state.
    /// On error the current stream is left untouched.
    fn attach(
        &mut self,
        pipe: StreamPipe,
        info: StreamInfo,
        shutdown: Arc<AtomicBool>,
        position: Duration,
    ) -> Result<(), MediaError> {
        let handle = self.ensure_output()?;
        let sink = Sink::try_new(handle).map_err(|e| MediaError::Output(e.to_string()))?;
        sink.pause();

        let played = Arc::new(AtomicU64::new(0));
        sink.append(StreamingSource::new(pipe.samples, info, pipe.finished, Arc::clone(&played)));

        self.drop_sink();
        if self.playing {
            sink.play();
        }
        self.sink = Some(sink);
        self.shutdown = shutdown;
        self.played = played;
        self.start_position = position;
        Ok(())
    }

    fn cancel_pending_seek(&mut self) {
        if let Some(pending) = self.pending_seek.take() {
            log::debug!("[AudioPlayer] Dropping pending seek to {:?}", pending.position);
            pending.shutdown.store(true, Ordering::Relaxed);
        }
    }

    fn drop_sink(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.cancel_pending_seek();
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.played = Arc::new(AtomicU64::new(0));
    }
}

impl MediaHandle for StreamPlayer {
    fn reset(&mut self) {
        self.drop_sink();
        self.source_url = None;
        self.stream_info = None;
        self.total_duration = None;
        self.start_position = Duration::ZERO;
        self.playing = false;
        self.started = false;
    }

    fn set_source(&mut self, url: &str) -> Result<(), MediaError> {
        reqwest::Url::parse(url).map_err(|e| MediaError::InvalidSource {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        self.source_url = Some(url.to_string());
        Ok(())
    }

    fn prepare(&mut self) -> Result<(), MediaError> {
        let url = self.source_url.clone().ok_or(MediaError::NoSource)?;
        self.ensure_output()?;
        self.drop_sink();
        self.playing = false;
        self.started = false;

        log::info!("[AudioPlayer] Preparing stream: {}", url);
        let (pipe, shutdown) = Self::open_pipe(&url, 0);

        let info = match ready_outcome(pipe.ready.recv_timeout(self.prepare_timeout), self.prepare_timeout) {
            Ok(info) => info,
            Err(e) => {
                shutdown.store(true, Ordering::Relaxed);
                return Err(e);
            }
        };

        if let Err(e) = self.attach(pipe, info, Arc::clone(&shutdown), Duration::ZERO) {
            shutdown.store(true, Ordering::Relaxed);
            return Err(e);
        }

        self.total_duration = info.estimated_duration();
        self.stream_info = Some(info);

        log::info!("[AudioPlayer] Stream ready (duration: {:?})", self.total_duration);
        Ok(())
    }

    fn start(&mut self) -> Result<(), MediaError> {
        let sink = self.sink.as_ref().ok_or(MediaError::NotPrepared)?;
        sink.play();
        self.playing = true;
        self.started = true;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
            self.playing = false;
            log::debug!("[AudioPlayer] Paused at {:?}", self.position());
        }
    }

    fn stop(&mut self) {
        log::debug!("[AudioPlayer] Stopping playback");
        self.drop_sink();
        self.start_position = Duration::ZERO;
        self.playing = false;
        self.started = false;
    }

    fn seek_to(&mut self, position: Duration) -> Result<(), MediaError> {
        let url = self.source_url.clone().ok_or(MediaError::NoSource)?;
        let info = self.stream_info.ok_or(MediaError::NotPrepared)?;
        if self.sink.is_none() {
            return Err(MediaError::NotPrepared);
        }

        let position = match self.total_duration {
            Some(total) => position.min(total),
            None => position,
        };
        self.cancel_pending_seek();

        let byte_offset = info.byte_offset(position);
        log::info!("[AudioPlayer] Seeking to {:?} (byte offset {})", position, byte_offset);

        let (pipe, shutdown) = Self::open_pipe(&url, byte_offset);
        self.pending_seek = Some(PendingSeek {
            pipe,
            shutdown,
            position,
            requested_at: Instant::now(),
        });
        Ok(())
    }

    fn poll_seek(&mut self) -> Option<Result<(), MediaError>> {
        let pending = self.pending_seek.as_ref()?;

        let message = match pending.pipe.ready.try_recv() {
            Ok(message) => Ok(message),
            Err(TryRecvError::Empty) if pending.requested_at.elapsed() < self.prepare_timeout => {
                return None;
            }
            Err(TryRecvError::Empty) => Err(RecvTimeoutError::Timeout),
            Err(TryRecvError::Disconnected) => Err(RecvTimeoutError::Disconnected),
        };

        let PendingSeek {
            pipe,
            shutdown,
            position,
            ..
        } = self.pending_seek.take()?;

        let result = ready_outcome(message, self.prepare_timeout)
            .and_then(|info| self.attach(pipe, info, Arc::clone(&shutdown), position));

        match &result {
            Ok(()) => log::info!("[AudioPlayer] Seek landed at {:?}", position),
            Err(e) => {
                shutdown.store(true, Ordering::Relaxed);
                log::warn!("[AudioPlayer] Seek to {:?} failed, keeping current stream: {}", position, e);
            }
        }
        Some(result)
    }

    fn is_finished(&self) -> bool {
        self.started
            && self.playing
            && self.pending_seek.is_none()
            && self.sink.as_ref().is_some_and(|sink| sink.empty())
    }

    fn position(&self) -> Duration {
        let samples_per_sec = self
            .stream_info
            .map(|info| u64::from(info.sample_rate) * u64::from(info.channels))
            .unwrap_or(0);
        if samples_per_sec == 0 {
            return self.start_position;
        }

        let played = self.played.load(Ordering::Relaxed);
        let position = self
            .start_position
            .saturating_add(Duration::from_secs_f64(played as f64 / samples_per_sec as f64));
        match self.total_duration {
            Some(total) => position.min(total),
            None => position,
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.total_duration
    }

    fn release(&mut self) {
        self.reset();
        if self.output.take().is_some() {
            log::info!("[AudioPlayer] Audio output released");
        }
    }
}

impl Drop for StreamPlayer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        self.cancel_pending_seek();
    }
}
