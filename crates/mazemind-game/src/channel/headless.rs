//! A channel with no UI, driven by simulated player snapshots

use std::fmt;

use glam::Vec3;
use mazemind_core::Countdown;
use tracing::{debug, info};

use super::{
    ChannelError, ChannelKind, ChannelPoll, ChannelRequest, CommunicationChannel, PathWatcher,
    PlayerResponse, PlayerSnapshot,
};

/// Wait used by timed requests that do not name one
pub const DEFAULT_WAIT_SECONDS: f32 = 10.0;

/// Answers a text question
pub type Responder = Box<dyn FnMut(&str) -> String>;

enum Gathering {
    Text { answer: String },
    Path { in_order: bool },
    Stillness { countdown: Countdown, origin: Vec3 },
    Timed { countdown: Countdown },
}

/// Headless [`CommunicationChannel`]. Text questions are answered by a
/// [`Responder`]; path, stillness and timed requests are resolved from the
/// snapshots passed to [`CommunicationChannel::poll`]. Everything the AI says
/// is kept in a transcript.
pub struct HeadlessChannel {
    responder: Responder,
    request: Option<ChannelRequest>,
    gathering: Option<Gathering>,
    watcher: PathWatcher,
    transcript: Vec<String>,
    abandoned: bool,
}

impl HeadlessChannel {
    pub fn new(responder: Responder) -> Self {
        Self {
            responder,
            request: None,
            gathering: None,
            watcher: PathWatcher::new(),
            transcript: Vec::new(),
            abandoned: false,
        }
    }

    /// A channel that answers every text question with `answer`
    pub fn answering(answer: &str) -> Self {
        let answer = answer.to_string();
        Self::new(Box::new(move |_| answer.clone()))
    }

    /// The request currently awaiting a response
    pub fn current_request(&self) -> Option<&ChannelRequest> {
        self.request.as_ref()
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Tear the channel down from the UI side; the next poll reports it
    pub fn abandon(&mut self) {
        if self.request.is_some() {
            self.abandoned = true;
        }
    }

    fn wait_seconds(seconds: f32) -> f32 {
        if seconds <= 0.0 {
            DEFAULT_WAIT_SECONDS
        } else {
            seconds
        }
    }
}

impl fmt::Debug for HeadlessChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessChannel")
            .field("request", &self.request)
            .field("transcript", &self.transcript.len())
            .field("abandoned", &self.abandoned)
            .finish()
    }
}

impl CommunicationChannel for HeadlessChannel {
    fn open(&mut self, request: ChannelRequest, player: &PlayerSnapshot) -> Result<(), ChannelError> {
        if self.request.is_some() {
            return Err(ChannelError::AlreadyOpen);
        }

        let gathering = match &request.kind {
            ChannelKind::Text => Gathering::Text {
                answer: (self.responder)(&request.message),
            },
            ChannelKind::Path { path, in_order } => {
                self.watcher.set_path(path.clone());
                self.watcher.start(player)?;
                Gathering::Path { in_order: *in_order }
            }
            ChannelKind::Stillness { seconds } => Gathering::Stillness {
                countdown: Countdown::new(Self::wait_seconds(*seconds)),
                origin: player.position,
            },
            ChannelKind::Timed { seconds } => Gathering::Timed {
                countdown: Countdown::new(Self::wait_seconds(*seconds)),
            },
        };

        info!("AI: {}", request.message);
        debug!("Opened {} channel", request.kind.name());
        self.transcript.push(request.message.clone());
        self.gathering = Some(gathering);
        self.request = Some(request);
        self.abandoned = false;
        Ok(())
    }

    fn poll(&mut self, player: &PlayerSnapshot, delta: f32) -> Result<ChannelPoll, ChannelError> {
        let Some(gathering) = self.gathering.as_mut() else {
            return Err(ChannelError::NotOpen);
        };
        if self.abandoned {
            return Ok(ChannelPoll::Abandoned);
        }

        let poll = match gathering {
            Gathering::Text { answer } => ChannelPoll::Ready(PlayerResponse::Text(answer.clone())),
            Gathering::Path { in_order } => {
                self.watcher.update(player, delta);
                if self.watcher.is_ready(player) {
                    match self.watcher.take_path() {
                        Some(path) => ChannelPoll::Ready(PlayerResponse::Path {
                            path,
                            in_order: *in_order,
                        }),
                        None => return Err(ChannelError::MissingPathTarget),
                    }
                } else {
                    ChannelPoll::Pending
                }
            }
            Gathering::Stillness { countdown, origin } => {
                if countdown.tick(delta) {
                    let moved = origin.x != player.position.x || origin.z != player.position.z;
                    ChannelPoll::Ready(PlayerResponse::Stillness { moved })
                } else {
                    ChannelPoll::Pending
                }
            }
            Gathering::Timed { countdown } => {
                if countdown.tick(delta) {
                    ChannelPoll::Ready(PlayerResponse::Acknowledged)
                } else {
                    ChannelPoll::Pending
                }
            }
        };
        Ok(poll)
    }

    fn close(&mut self) {
        self.request = None;
        self.gathering = None;
        self.abandoned = false;
        self.watcher.reset();
    }

    fn announce(&mut self, message: &str) {
        info!("AI: {}", message);
        self.transcript.push(message.to_string());
    }

    fn is_open(&self) -> bool {
        self.request.is_some()
    }
}
