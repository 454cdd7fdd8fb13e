use std::sync::{Arc, Mutex, OnceLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

/// One tracing event emitted by the panel, flattened to strings.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn message(&self) -> Option<&str> {
        self.field("message")
    }
}

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// Shared view of every event the panel logged in this test binary.
///
/// The subscriber is process-global, so tests running in parallel in the
/// same binary see each other's events. Look events up by message and
/// field rather than by position.
#[derive(Clone)]
pub struct LogCapture {
    buffer: Buffer,
}

impl LogCapture {
    /// Install the capturing subscriber on first use and hand out a view.
    pub fn install() -> Self {
        static BUFFER: OnceLock<Buffer> = OnceLock::new();

        let buffer = BUFFER
            .get_or_init(|| {
                let buffer = Buffer::default();
                let subscriber = tracing_subscriber::registry().with(CaptureLayer {
                    buffer: buffer.clone(),
                });
                tracing::subscriber::set_global_default(subscriber)
                    .expect("another global tracing subscriber is already set");
                buffer
            })
            .clone();

        Self { buffer }
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.buffer.lock().unwrap().clone()
    }

    /// First event logged with exactly this message.
    pub fn find(&self, message: &str) -> Option<CapturedEvent> {
        self.buffer
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.message() == Some(message))
            .cloned()
    }

    /// First event with this message whose `key` field equals `value`.
    pub fn find_with(&self, message: &str, key: &str, value: &str) -> Option<CapturedEvent> {
        self.buffer
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.message() == Some(message) && e.field(key) == Some(value))
            .cloned()
    }
}

struct CaptureLayer {
    buffer: Buffer,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Vec::new();
        event.record(&mut FieldVisitor { fields: &mut fields });

        let meta = event.metadata();
        self.buffer.lock().unwrap().push(CapturedEvent {
            level: *meta.level(),
            target: meta.target().to_string(),
            fields,
        });
    }
}

/// Strings keep their raw text; everything else goes through `Debug`, so
/// numbers read back as `"1"` and display-formatted values keep their form.
struct FieldVisitor<'a> {
    fields: &'a mut Vec<(String, String)>,
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields
            .push((field.name().to_string(), format!("{value:?}")));
    }
}
