//! End-to-end playback scenarios against synthetic collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cutscene::{
    AudioError, AudioFormat, AudioSink, AudioSinkProvider, CutsceneController, DecodeError,
    DecodedUnit, DecoderOpener, DisplaySurface, DrawRect, MediaDecoder, MediaInfo, MediaSource,
    PlayRequest, Session, SourceType, SurfaceProvider,
};
use cutscene::media::decoder::{AudioData, VideoData};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("cutscene=debug")
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// Synthetic decoder
// ---------------------------------------------------------------------------

#[derive(Default)]
struct DecoderLog {
    stops: AtomicUsize,
    drops: AtomicUsize,
}

/// Emits `frame_count` 4x2 BGR frames at `frame_interval_us` spacing. Frame
/// `k` is filled with the byte `k + 1`. When `audio` is set, an audio-only
/// unit precedes the video and each video unit carries an audio block.
struct SyntheticDecoder {
    info: MediaInfo,
    frame_count: usize,
    frame_interval_us: i64,
    next: usize,
    audio: bool,
    audio_only_first: bool,
    buf: Vec<u8>,
    audio_buf: Vec<u8>,
    log: Arc<DecoderLog>,
}

impl SyntheticDecoder {
    fn video_only(frame_count: usize, frame_interval_us: i64, log: Arc<DecoderLog>) -> Self {
        Self {
            info: MediaInfo {
                width: 4,
                height: 2,
                frame_rate: 30.0,
                audio_channels: 0,
                sample_rate: 0,
            },
            frame_count,
            frame_interval_us,
            next: 0,
            audio: false,
            audio_only_first: false,
            buf: Vec::new(),
            audio_buf: Vec::new(),
            log,
        }
    }

    fn with_audio(frame_count: usize, frame_interval_us: i64, log: Arc<DecoderLog>) -> Self {
        Self {
            info: MediaInfo {
                width: 4,
                height: 2,
                frame_rate: 30.0,
                audio_channels: 2,
                sample_rate: 44_100,
            },
            frame_count,
            frame_interval_us,
            next: 0,
            audio: true,
            audio_only_first: true,
            buf: Vec::new(),
            audio_buf: Vec::new(),
            log,
        }
    }
}

impl MediaDecoder for SyntheticDecoder {
    fn info(&self) -> MediaInfo {
        self.info
    }

    fn grab(&mut self) -> Result<Option<DecodedUnit<'_>>, DecodeError> {
        if self.audio_only_first {
            // Audio that arrives before any video frame must never play.
            self.audio_only_first = false;
            self.audio_buf = vec![0xEE; 8];
            return Ok(Some(DecodedUnit {
                timestamp_us: 0,
                video: None,
                audio: Some(AudioData {
                    bytes: &self.audio_buf,
                }),
            }));
        }

        if self.next >= self.frame_count {
            return Ok(None);
        }
        let k = self.next;
        self.next += 1;

        // The internal buffer is rewritten on every grab, exactly like a
        // real decoder reusing its frame storage.
        self.buf = vec![(k + 1) as u8; 4 * 2 * 3];
        self.audio_buf = vec![(k + 1) as u8; 8];

        Ok(Some(DecodedUnit {
            timestamp_us: k as i64 * self.frame_interval_us,
            video: Some(VideoData {
                pixels: &self.buf,
                width: 4,
                height: 2,
                stride: 12,
            }),
            audio: if self.audio {
                Some(AudioData {
                    bytes: &self.audio_buf,
                })
            } else {
                None
            },
        }))
    }

    fn stop(&mut self) {
        self.log.stops.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for SyntheticDecoder {
    fn drop(&mut self) {
        self.log.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// A decoder that yields untimestamped frames forever; used to wedge the
/// producer against a full queue.
struct EndlessDecoder {
    buf: Vec<u8>,
    log: Arc<DecoderLog>,
}

impl MediaDecoder for EndlessDecoder {
    fn info(&self) -> MediaInfo {
        MediaInfo {
            width: 4,
            height: 2,
            frame_rate: 30.0,
            audio_channels: 0,
            sample_rate: 0,
        }
    }

    fn grab(&mut self) -> Result<Option<DecodedUnit<'_>>, DecodeError> {
        self.buf = vec![0x55; 4 * 2 * 3];
        Ok(Some(DecodedUnit {
            timestamp_us: -1,
            video: Some(VideoData {
                pixels: &self.buf,
                width: 4,
                height: 2,
                stride: 12,
            }),
            audio: None,
        }))
    }

    fn stop(&mut self) {
        self.log.stops.fetch_add(1, Ordering::SeqCst);
    }
}

struct OneShotOpener {
    decoder: Mutex<Option<Box<dyn MediaDecoder>>>,
}

impl OneShotOpener {
    fn new(decoder: Box<dyn MediaDecoder>) -> Self {
        Self {
            decoder: Mutex::new(Some(decoder)),
        }
    }
}

impl DecoderOpener for OneShotOpener {
    fn open(&self, source: &MediaSource) -> Result<Box<dyn MediaDecoder>, DecodeError> {
        self.decoder
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| DecodeError::Open(source.locator.clone(), "already opened".into()))
    }
}

// ---------------------------------------------------------------------------
// Recording surface
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SurfaceLog {
    created: Vec<(u32, u32)>,
    /// Pixel (0,0) captured at each upload.
    uploads: Vec<u32>,
    draws: Vec<DrawRect>,
    destroys: usize,
}

struct RecordingSurface {
    shared: Arc<Mutex<SurfaceLog>>,
    image: (u32, u32),
    last00: u32,
}

impl DisplaySurface for RecordingSurface {
    fn surface_size(&self) -> (u32, u32) {
        (640, 480)
    }

    fn image_size(&self) -> (u32, u32) {
        self.image
    }

    fn set_pixel(&mut self, x: u32, y: u32, packed: u32) {
        if x == 0 && y == 0 {
            self.last00 = packed;
        }
    }

    fn upload(&mut self) {
        self.shared.lock().unwrap().uploads.push(self.last00);
    }

    fn draw(&mut self, dest: DrawRect) {
        self.shared.lock().unwrap().draws.push(dest);
    }

    fn destroy(&mut self) {
        self.shared.lock().unwrap().destroys += 1;
    }
}

struct RecordingSurfaces {
    shared: Arc<Mutex<SurfaceLog>>,
}

impl SurfaceProvider for RecordingSurfaces {
    fn create_image(&mut self, width: u32, height: u32) -> Box<dyn DisplaySurface> {
        self.shared.lock().unwrap().created.push((width, height));
        Box::new(RecordingSurface {
            shared: Arc::clone(&self.shared),
            image: (width, height),
            last00: 0,
        })
    }
}

// ---------------------------------------------------------------------------
// Recording audio sink
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SinkLog {
    opened: Vec<AudioFormat>,
    writes: Vec<Vec<u8>>,
    drains: usize,
    stops: usize,
    closes: usize,
}

struct RecordingSink {
    shared: Arc<Mutex<SinkLog>>,
}

impl AudioSink for RecordingSink {
    fn open(&mut self, format: AudioFormat) -> Result<(), AudioError> {
        self.shared.lock().unwrap().opened.push(format);
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), AudioError> {
        self.shared.lock().unwrap().writes.push(bytes.to_vec());
        Ok(())
    }

    fn drain(&mut self) {
        self.shared.lock().unwrap().drains += 1;
    }

    fn stop(&mut self) {
        self.shared.lock().unwrap().stops += 1;
    }

    fn close(&mut self) {
        self.shared.lock().unwrap().closes += 1;
    }
}

struct RecordingSinks {
    shared: Arc<Mutex<SinkLog>>,
}

impl AudioSinkProvider for RecordingSinks {
    fn open_sink(&mut self) -> Box<dyn AudioSink> {
        Box::new(RecordingSink {
            shared: Arc::clone(&self.shared),
        })
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

fn request(path: &str) -> PlayRequest {
    PlayRequest {
        path: path.into(),
        source_type: SourceType::Url,
        disable_movement: true,
        hide_hud: true,
    }
}

fn tag(packed: u32) -> u32 {
    packed & 0xFF
}

#[test]
fn test_ten_frame_stream_plays_to_completion() {
    init_logging();

    let decoder_log = Arc::new(DecoderLog::default());
    let surface_log = Arc::new(Mutex::new(SurfaceLog::default()));
    let sink_log = Arc::new(Mutex::new(SinkLog::default()));

    let mut controller = CutsceneController::new(
        Box::new(OneShotOpener::new(Box::new(SyntheticDecoder::video_only(
            10,
            33_333,
            Arc::clone(&decoder_log),
        )))),
        Box::new(RecordingSurfaces {
            shared: Arc::clone(&surface_log),
        }),
        Box::new(RecordingSinks {
            shared: Arc::clone(&sink_log),
        }),
    );

    controller.start(&request("https://example.com/intro.mp4")).unwrap();
    assert!(controller.is_playing());
    assert!(controller.is_movement_disabled());
    assert!(controller.should_hide_overlay());

    // Drive the render loop until the session closes itself.
    let deadline = Instant::now() + Duration::from_secs(5);
    while controller.is_playing() {
        assert!(Instant::now() < deadline, "session never finished");
        controller.render_tick(Instant::now());
        std::thread::sleep(Duration::from_millis(1));
    }

    let log = surface_log.lock().unwrap();
    assert_eq!(log.created, vec![(4, 2)]);
    // One initial black upload, then the ten frames, in decode order.
    assert_eq!(log.uploads.len(), 11);
    assert_eq!(tag(log.uploads[0]), 0);
    let tags: Vec<u32> = log.uploads[1..].iter().map(|&p| tag(p)).collect();
    assert_eq!(tags, (1..=10).collect::<Vec<u32>>());
    assert_eq!(log.destroys, 1);

    // 4:2 video letterboxed on a 640x480 surface.
    assert!(!log.draws.is_empty());
    assert_eq!(
        *log.draws.last().unwrap(),
        DrawRect {
            x: 0,
            y: 80,
            width: 640,
            height: 320
        }
    );

    assert_eq!(decoder_log.stops.load(Ordering::SeqCst), 1);
    assert_eq!(decoder_log.drops.load(Ordering::SeqCst), 1);

    // Video-only stream: the sink was never opened.
    assert!(sink_log.lock().unwrap().opened.is_empty());

    // Flags drop with the session.
    assert!(!controller.is_movement_disabled());
    assert!(!controller.should_hide_overlay());
}

#[test]
fn test_audio_is_gated_behind_first_video_frame() {
    init_logging();

    let decoder_log = Arc::new(DecoderLog::default());
    let surface_log = Arc::new(Mutex::new(SurfaceLog::default()));
    let sink_log = Arc::new(Mutex::new(SinkLog::default()));

    let mut controller = CutsceneController::new(
        Box::new(OneShotOpener::new(Box::new(SyntheticDecoder::with_audio(
            5,
            33_333,
            Arc::clone(&decoder_log),
        )))),
        Box::new(RecordingSurfaces {
            shared: Arc::clone(&surface_log),
        }),
        Box::new(RecordingSinks {
            shared: Arc::clone(&sink_log),
        }),
    );

    controller.start(&request("https://example.com/talkie.mp4")).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while controller.is_playing() {
        assert!(Instant::now() < deadline, "session never finished");
        controller.render_tick(Instant::now());
        std::thread::sleep(Duration::from_millis(1));
    }

    let log = sink_log.lock().unwrap();
    assert_eq!(
        log.opened,
        vec![AudioFormat {
            sample_rate: 44_100,
            channels: 2
        }]
    );

    // The leading audio-only unit (0xEE bytes) was discarded; every block
    // after the first video frame went through, in order.
    assert_eq!(log.writes.len(), 5);
    for (i, write) in log.writes.iter().enumerate() {
        assert_eq!(write, &vec![(i + 1) as u8; 8]);
    }

    // Sink wound down exactly once, in drain → stop → close order.
    assert_eq!((log.drains, log.stops, log.closes), (1, 1, 1));
}

#[test]
fn test_stop_unblocks_producer_wedged_on_full_queue() {
    init_logging();

    let decoder_log = Arc::new(DecoderLog::default());
    let surface_log = Arc::new(Mutex::new(SurfaceLog::default()));
    let sink_log = Arc::new(Mutex::new(SinkLog::default()));

    let mut controller = CutsceneController::new(
        Box::new(OneShotOpener::new(Box::new(EndlessDecoder {
            buf: Vec::new(),
            log: Arc::clone(&decoder_log),
        }))),
        Box::new(RecordingSurfaces {
            shared: Arc::clone(&surface_log),
        }),
        Box::new(RecordingSinks {
            shared: Arc::clone(&sink_log),
        }),
    );

    controller.start(&request("https://example.com/endless.mp4")).unwrap();

    // No render ticks: the queue fills and the producer blocks in push.
    std::thread::sleep(Duration::from_millis(100));

    let begun = Instant::now();
    controller.stop();
    assert!(begun.elapsed() < Duration::from_secs(2));

    assert!(!controller.is_playing());
    assert_eq!(decoder_log.stops.load(Ordering::SeqCst), 1);
    assert_eq!(surface_log.lock().unwrap().destroys, 1);
}

#[test]
fn test_teardown_is_idempotent() {
    init_logging();

    let decoder_log = Arc::new(DecoderLog::default());
    let surface_log = Arc::new(Mutex::new(SurfaceLog::default()));

    let opener = OneShotOpener::new(Box::new(SyntheticDecoder::video_only(
        3,
        33_333,
        Arc::clone(&decoder_log),
    )));
    let mut surfaces = RecordingSurfaces {
        shared: Arc::clone(&surface_log),
    };

    let source = MediaSource {
        locator: "https://example.com/short.mp4".into(),
        kind: SourceType::Url,
    };
    let mut session = Session::start(
        &source,
        &opener,
        &mut surfaces,
        Box::new(cutscene::NullAudioSink),
    )
    .unwrap();

    // Two stops racing one another must release everything exactly once.
    session.stop();
    session.stop();

    assert!(session.is_closed());
    assert_eq!(decoder_log.stops.load(Ordering::SeqCst), 1);
    assert_eq!(decoder_log.drops.load(Ordering::SeqCst), 1);
    assert_eq!(surface_log.lock().unwrap().destroys, 1);
}

#[test]
fn test_starting_a_new_session_stops_the_previous_one() {
    init_logging();

    let decoder_log = Arc::new(DecoderLog::default());
    let surface_log = Arc::new(Mutex::new(SurfaceLog::default()));
    let sink_log = Arc::new(Mutex::new(SinkLog::default()));

    let mut controller = CutsceneController::new(
        Box::new(OneShotOpener::new(Box::new(EndlessDecoder {
            buf: Vec::new(),
            log: Arc::clone(&decoder_log),
        }))),
        Box::new(RecordingSurfaces {
            shared: Arc::clone(&surface_log),
        }),
        Box::new(RecordingSinks {
            shared: Arc::clone(&sink_log),
        }),
    );

    controller.start(&request("https://example.com/first.mp4")).unwrap();
    assert!(controller.is_playing());

    // The one-shot opener refuses a second open, but the first session
    // must already have been stopped by then.
    assert!(controller.start(&request("https://example.com/second.mp4")).is_err());
    assert!(!controller.is_playing());
    assert_eq!(decoder_log.stops.load(Ordering::SeqCst), 1);
    assert_eq!(surface_log.lock().unwrap().destroys, 1);
}
