//! `Transport` implementation over a `rodio` sink.
//!
//! Each `load` builds a fresh paused `Sink` attached to the shared output
//! stream; the previous sink is stopped first. Local files are opened and
//! decoded in place. Remote sources are downloaded and decoded on a loader
//! thread so the event loop keeps drawing; the finished sink comes back
//! through a channel and is announced with `TransportEvent::Ready`.

use std::io::{Read, Seek};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use crate::error::TransportError;

use super::source::{SourceKind, download, open_local};
use super::{LoadStatus, Transport, TransportEvent};

struct LoadJob {
    token: u64,
    url: String,
}

struct Loaded {
    token: u64,
    result: Result<(Sink, Option<Duration>), TransportError>,
}

pub struct RodioTransport {
    stream: OutputStream,
    jobs: Sender<LoadJob>,
    loaded: Receiver<Loaded>,
    /// Token of the remote load still in flight, if any.
    pending_token: Option<u64>,
    sink: Option<Sink>,
    total: Option<Duration>,
    volume: f32,
    /// Set once `play` succeeded for the loaded source; guards `Ended`.
    started: bool,
    ended_reported: bool,
    pending: Vec<TransportEvent>,
}

impl RodioTransport {
    /// Open the default output device and start the loader thread.
    pub fn open(fetch_timeout: Duration) -> Result<Self, TransportError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| TransportError::NoDevice(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped; the terminal belongs to the UI.
        stream.log_on_drop(false);

        let agent = ureq::AgentBuilder::new()
            .timeout_connect(fetch_timeout)
            .timeout_read(fetch_timeout)
            .build();

        let (job_tx, job_rx) = mpsc::channel::<LoadJob>();
        let (loaded_tx, loaded_rx) = mpsc::channel::<Loaded>();
        let mixer = stream.mixer().clone();
        thread::Builder::new()
            .name("audio-loader".to_string())
            .spawn(move || run_loader(mixer, agent, job_rx, loaded_tx))
            .map_err(|e| TransportError::NoDevice(format!("cannot start audio loader: {e}")))?;

        Ok(Self {
            stream,
            jobs: job_tx,
            loaded: loaded_rx,
            pending_token: None,
            sink: None,
            total: None,
            volume: 1.0,
            started: false,
            ended_reported: false,
            pending: Vec::new(),
        })
    }

    fn install(&mut self, sink: Sink, total: Option<Duration>) {
        sink.set_volume(self.volume);
        self.sink = Some(sink);
        self.total = total;
        self.started = false;
        self.ended_reported = false;
        if let Some(total) = total {
            self.pending
                .push(TransportEvent::DurationKnown(total.as_secs_f64()));
        }
    }

    /// Take finished loads off the loader channel. Only the load matching
    /// `pending_token` is installed; anything older is dropped.
    fn collect_loaded(&mut self) {
        loop {
            match self.loaded.try_recv() {
                Ok(Loaded { token, result }) => {
                    if self.pending_token != Some(token) {
                        log::debug!("transport: dropping stale load (token {token})");
                        continue;
                    }
                    self.pending_token = None;
                    match result {
                        Ok((sink, total)) => {
                            self.install(sink, total);
                            self.pending.push(TransportEvent::Ready { token });
                        }
                        Err(e) => {
                            log::warn!("transport: load failed: {e}");
                            self.pending.push(TransportEvent::LoadFailed {
                                token,
                                reason: e.to_string(),
                            });
                        }
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.pending_token.take().is_some() {
                        self.pending
                            .push(TransportEvent::Error("audio loader stopped".to_string()));
                    }
                    break;
                }
            }
        }
    }
}

/// Loader thread body: fetch and decode remote sources, newest request first.
fn run_loader(mixer: Mixer, agent: ureq::Agent, jobs: Receiver<LoadJob>, loaded: Sender<Loaded>) {
    while let Ok(mut job) = jobs.recv() {
        // Requests queued behind this one supersede it.
        if let Some(newer) = jobs.try_iter().last() {
            job = newer;
        }
        let result = download(&agent, &job.url)
            .and_then(|bytes| build_sink(&mixer, &job.url, std::io::Cursor::new(bytes)));
        if loaded
            .send(Loaded {
                token: job.token,
                result,
            })
            .is_err()
        {
            break;
        }
    }
    log::debug!("transport: audio loader stopped");
}

fn build_sink<R>(
    mixer: &Mixer,
    url: &str,
    reader: R,
) -> Result<(Sink, Option<Duration>), TransportError>
where
    R: Read + Seek + Send + Sync + 'static,
{
    let source = Decoder::new(reader).map_err(|e| TransportError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let total = source.total_duration();

    let sink = Sink::connect_new(mixer);
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}

impl Transport for RodioTransport {
    fn load(&mut self, url: &str, token: u64) -> Result<LoadStatus, TransportError> {
        self.stop();

        match SourceKind::of(url) {
            SourceKind::Local(path) => {
                let file = open_local(&path, url)?;
                let (sink, total) = build_sink(self.stream.mixer(), url, file)?;
                log::debug!("transport: opened {} ({total:?})", path.display());
                self.install(sink, total);
                Ok(LoadStatus::Ready)
            }
            SourceKind::Remote(remote) => {
                self.jobs
                    .send(LoadJob { token, url: remote })
                    .map_err(|_| TransportError::Source {
                        url: url.to_string(),
                        reason: "audio loader stopped".to_string(),
                    })?;
                self.pending_token = Some(token);
                log::debug!("transport: fetching {url} (token {token})");
                Ok(LoadStatus::Pending)
            }
        }
    }

    fn play(&mut self) -> Result<(), TransportError> {
        let sink = self.sink.as_ref().ok_or(TransportError::NothingLoaded)?;
        sink.play();
        self.started = true;
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.pending_token = None;
        self.total = None;
        self.started = false;
        self.ended_reported = false;
    }

    fn seek(&mut self, seconds: f64) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        let target = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or_default();
        if self.total.is_some_and(|total| target >= total) {
            if !self.ended_reported {
                self.ended_reported = true;
                self.pending.push(TransportEvent::Ended);
            }
            return;
        }
        if let Err(e) = sink.try_seek(target) {
            log::warn!("transport: seek to {seconds:.1}s failed: {e}");
            self.pending.push(TransportEvent::SeekFailed(e.to_string()));
            return;
        }
        self.ended_reported = false;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(volume);
        }
    }

    fn poll_events(&mut self) -> Vec<TransportEvent> {
        self.collect_loaded();
        let mut events = std::mem::take(&mut self.pending);

        if let Some(sink) = self.sink.as_ref() {
            if self.started && !sink.is_paused() && !self.ended_reported {
                if sink.empty() {
                    self.ended_reported = true;
                    events.push(TransportEvent::Ended);
                } else {
                    events.push(TransportEvent::Progress(sink.get_pos().as_secs_f64()));
                }
            }
        }

        events
    }
}
