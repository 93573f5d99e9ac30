use crate::canvas::classify::{classify, NodeClass};
use crate::canvas::node::{CanvasHost, RawNode};
use crate::canvas::snapshot::{ExportItem, SnapshotBuilder};
use crate::error::CanvasError;
use tokio::sync::Mutex;

/// What the plugin panel shows.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub items: Vec<ExportItem>,
    pub message: String,
    /// Last rebuild failure, shown until dismissed or a rebuild succeeds.
    pub error: Option<String>,
}

/// Keeps the export list in sync with the host selection.
///
/// Rebuilds run one at a time: the view lock is held for the whole rebuild,
/// so notifications are applied in the order they acquire it.
pub struct SnapshotSession<H: CanvasHost> {
    host: H,
    builder: SnapshotBuilder,
    view: Mutex<SessionView>,
}

impl<H: CanvasHost> SnapshotSession<H> {
    pub fn new(host: H) -> Self {
        Self::with_builder(host, SnapshotBuilder::default())
    }

    pub fn with_builder(host: H, builder: SnapshotBuilder) -> Self {
        Self { host, builder, view: Mutex::new(SessionView::default()) }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Re-read the selection from the host and rebuild.
    pub async fn refresh(&self) -> SessionView {
        match self.host.selection().await {
            Ok(selection) => self.on_selection_changed(selection).await,
            Err(err) => {
                let mut view = self.view.lock().await;
                record_failure(&mut view, err);
                view.clone()
            }
        }
    }

    /// Selection-change notification from the host.
    pub async fn on_selection_changed(&self, selection: Vec<H::Node>) -> SessionView {
        let mut view = self.view.lock().await;
        match self.rebuild(&selection).await {
            Ok((items, message)) => {
                view.items = items;
                view.message = message;
                view.error = None;
            }
            Err(err) => record_failure(&mut view, err),
        }
        view.clone()
    }

    pub async fn view(&self) -> SessionView {
        self.view.lock().await.clone()
    }

    pub async fn dismiss_error(&self) {
        self.view.lock().await.error = None;
    }

    async fn rebuild(&self, selection: &[H::Node]) -> Result<(Vec<ExportItem>, String), CanvasError> {
        let root = self.host.canvas_root().await?;
        let master = root
            .as_ref()
            .filter(|r| classify(r.class_tag()) == NodeClass::ComponentMaster);

        let items = self.builder.build(selection, master).await?;
        let message = status_message(master.map(|m| m.string("componentName")), selection.len());
        Ok((items, message))
    }
}

fn record_failure(view: &mut SessionView, err: CanvasError) {
    tracing::warn!(error = %err, "failed to update items from selection");
    view.error = Some(err.to_string());
}

/// `master` is `Some(componentName)` when editing a component in isolation.
fn status_message(master: Option<Option<String>>, selected: usize) -> String {
    match master {
        Some(name) => {
            let name = name.unwrap_or_else(|| "Component".to_string());
            if selected == 0 {
                format!("{name} master + select variants/frames")
            } else {
                format!("{name} master + {selected} selected")
            }
        }
        None if selected == 0 => "Select frames on canvas to export".to_string(),
        None => format!("{selected} item(s) selected"),
    }
}
