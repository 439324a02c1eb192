//! Audio playback side-channel.
//!
//! The interpreter never touches an audio device; it talks to an
//! [`AudioSink`] supplied by the host. The channel enforces the one rule
//! the action stream relies on: starting a clip always stops the previous
//! one for this canvas first.

use crate::resource::ResolvedResource;

/// Playable audio content after resource resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioSource {
    /// Remote clip, streamed by the host.
    Url(String),
    /// Embedded clip bytes from the resource map.
    Embedded { mime: String, data: Vec<u8> },
}

impl AudioSource {
    /// Convert a resolved resource into a playable source, if it is one.
    pub fn from_resolved(resolved: ResolvedResource) -> Option<Self> {
        match resolved {
            ResolvedResource::RemoteUrl(url) => Some(AudioSource::Url(url)),
            ResolvedResource::Raster { mime, data } => Some(AudioSource::Embedded { mime, data }),
            // Vector markup is not audio; missing keys play nothing.
            ResolvedResource::VectorMarkup(_) | ResolvedResource::NotFound => None,
        }
    }
}

/// Handle to an in-flight clip.
pub type ClipId = u64;

/// Host-provided playback backend.
pub trait AudioSink {
    /// Begin playback, returning a handle for later cancellation.
    fn start(&mut self, source: &AudioSource) -> ClipId;

    /// Halt playback and release the clip's resources.
    fn stop(&mut self, clip: ClipId);
}

/// Sink that swallows playback; used headless and during replay.
#[derive(Debug, Default)]
pub struct NullAudioSink {
    next: ClipId,
}

impl AudioSink for NullAudioSink {
    fn start(&mut self, _source: &AudioSource) -> ClipId {
        self.next += 1;
        self.next
    }

    fn stop(&mut self, _clip: ClipId) {}
}

/// Per-canvas playback state: at most one in-flight clip.
pub struct AudioChannel {
    sink: Box<dyn AudioSink>,
    current: Option<ClipId>,
}

impl AudioChannel {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            current: None,
        }
    }

    /// Channel that plays nothing.
    pub fn muted() -> Self {
        Self::new(Box::new(NullAudioSink::default()))
    }

    /// Start a clip, stopping and releasing any previous one first.
    pub fn play(&mut self, source: AudioSource) {
        self.stop();
        self.current = Some(self.sink.start(&source));
    }

    /// Stop the in-flight clip, if any.
    pub fn stop(&mut self) {
        if let Some(clip) = self.current.take() {
            self.sink.stop(clip);
        }
    }

    /// Release the handle once the host reports natural completion.
    /// A stale completion for an already-replaced clip is ignored.
    pub fn clip_finished(&mut self, clip: ClipId) {
        if self.current == Some(clip) {
            self.current = None;
        }
    }

    /// Whether a clip is currently held.
    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
pub(crate) mod test_sink {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// What a recording sink observed, in order.
    #[derive(Debug, Clone, PartialEq)]
    pub enum AudioEvent {
        Started(ClipId, AudioSource),
        Stopped(ClipId),
    }

    /// Sink that records every call for assertions.
    pub struct RecordingSink {
        pub events: Rc<RefCell<Vec<AudioEvent>>>,
        next: ClipId,
    }

    impl RecordingSink {
        pub fn new() -> (Self, Rc<RefCell<Vec<AudioEvent>>>) {
            let events = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    events: events.clone(),
                    next: 0,
                },
                events,
            )
        }
    }

    impl AudioSink for RecordingSink {
        fn start(&mut self, source: &AudioSource) -> ClipId {
            self.next += 1;
            self.events
                .borrow_mut()
                .push(AudioEvent::Started(self.next, source.clone()));
            self.next
        }

        fn stop(&mut self, clip: ClipId) {
            self.events.borrow_mut().push(AudioEvent::Stopped(clip));
        }
    }
}
