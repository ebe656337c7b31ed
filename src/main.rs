//! bbat-replay: replays a scripted editing session against an in-memory store
//! and prints what would have been saved.
//!
//! Usage: `bbat-replay <session.json>`

#[cfg(not(target_arch = "wasm32"))]
mod replay {
    use std::time::Duration;

    use bbat::{
        AnnotationDocument, AnnotationEditor, CategoryCatalog, EditorConfig, EditorError,
        HostRequest, ImageSize, KeyEvent, MemoryStore, NormalizedAnnotation, Platform, Point,
        Size,
    };
    use serde::Deserialize;

    #[derive(Debug, thiserror::Error)]
    pub enum ReplayError {
        #[error("Cannot read session script: {0}")]
        Io(#[from] std::io::Error),

        #[error("Invalid session script: {0}")]
        Script(#[from] serde_json::Error),

        #[error(transparent)]
        Editor(#[from] EditorError),
    }

    #[derive(Debug, Deserialize)]
    struct ImageSpec {
        id: String,
        width: f32,
        height: f32,
    }

    #[derive(Debug, Deserialize)]
    struct Session {
        #[serde(default = "default_project")]
        project: String,
        image: ImageSpec,
        #[serde(default)]
        container: Option<Size>,
        classes: CategoryCatalog,
        #[serde(default)]
        objects: Vec<NormalizedAnnotation>,
        #[serde(default)]
        suggestions: Vec<NormalizedAnnotation>,
        #[serde(default)]
        config: EditorConfig,
        #[serde(default)]
        platform: Platform,
        events: Vec<Event>,
    }

    fn default_project() -> String {
        "replay".to_string()
    }

    #[derive(Debug, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum Event {
        PointerDown { x: f32, y: f32 },
        PointerMove { x: f32, y: f32 },
        PointerUp { x: f32, y: f32 },
        Wheel { x: f32, y: f32, delta_y: f32 },
        Key(KeyEvent),
        AssignClass { class: String },
        DrawMode { on: bool },
        Paste { text: String },
        Undo,
        Redo,
        DeleteAll,
        AutoAnnotate,
        /// Let time pass, then give the save loop a chance to run
        Wait { ms: u64 },
        Save,
    }

    /// Host side of the session: clipboard and request handling.
    struct Host {
        clipboard: Option<String>,
    }

    impl Host {
        async fn serve(
            &mut self,
            editor: &mut AnnotationEditor,
            store: &MemoryStore,
        ) -> Result<(), ReplayError> {
            for request in editor.drain_requests() {
                match request {
                    HostRequest::WriteClipboard(text) => self.clipboard = Some(text),
                    HostRequest::ReadClipboard => {
                        if let Some(text) = self.clipboard.clone() {
                            // A rejected paste is reported through a notice
                            let _ = editor.paste(&text);
                        }
                    }
                    HostRequest::Save => {
                        if let Err(e) = editor.save(store).await {
                            log::warn!("Save failed: {}", e);
                        }
                    }
                    other => log::info!("Host request ignored in replay: {:?}", other),
                }
            }
            for notice in editor.drain_notices() {
                println!("notice: {notice}");
            }
            Ok(())
        }
    }

    pub async fn run(path: &str) -> Result<(), ReplayError> {
        let session: Session = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Replaying {} events on image {}",
            session.events.len(),
            session.image.id
        );

        let store = MemoryStore::new();
        store.insert(
            &session.project,
            &session.image.id,
            AnnotationDocument {
                objects: session.objects,
            },
        );
        store.set_suggestions(
            &session.project,
            &session.image.id,
            AnnotationDocument {
                objects: session.suggestions,
            },
        );

        let mut editor = AnnotationEditor::new(
            session.project.clone(),
            session.classes,
            session.config,
            session.platform,
        );
        if let Some(container) = session.container {
            editor.set_container(container);
        }
        editor
            .open_image(
                &store,
                &session.image.id,
                ImageSize::new(session.image.width, session.image.height),
            )
            .await?;

        let mut host = Host { clipboard: None };
        for event in session.events {
            match event {
                Event::PointerDown { x, y } => editor.pointer_down(Point::new(x, y)),
                Event::PointerMove { x, y } => editor.pointer_move(Point::new(x, y)),
                Event::PointerUp { x, y } => editor.pointer_up(Point::new(x, y)),
                Event::Wheel { x, y, delta_y } => editor.wheel(Point::new(x, y), delta_y),
                Event::Key(key) => {
                    editor.handle_key(&key);
                }
                Event::AssignClass { class } => {
                    if let Err(e) = editor.assign_class_to_selected(&class) {
                        log::warn!("Class assignment failed: {}", e);
                    }
                }
                Event::DrawMode { on } => {
                    editor.set_draw_mode(on);
                }
                Event::Paste { text } => {
                    let _ = editor.paste(&text);
                }
                Event::Undo => editor.undo(),
                Event::Redo => editor.redo(),
                Event::DeleteAll => editor.delete_all(),
                Event::AutoAnnotate => {
                    if let Err(e) = editor.auto_annotate(&store).await {
                        log::warn!("Auto-annotation failed: {}", e);
                    }
                }
                Event::Wait { ms } => {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    if let Some(outcome) = editor.run_autosave(&store).await {
                        log::info!("Auto-save: {:?}", outcome);
                    }
                }
                Event::Save => {
                    if let Err(e) = editor.save(&store).await {
                        log::warn!("Save failed: {}", e);
                    }
                }
            }
            host.serve(&mut editor, &store).await?;
        }

        println!("status: {:?}", editor.status());
        println!(
            "annotations: {}",
            serde_json::to_string_pretty(editor.annotations())?
        );
        match store.last_payload() {
            Some(payload) => println!("saved: {}", serde_json::to_string_pretty(&payload)?),
            None => println!("saved: nothing"),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: bbat-replay <session.json>");
        std::process::exit(2);
    };

    // Log level comes from the session's config when it parses, RUST_LOG overrides
    let level = std::fs::read_to_string(&path)
        .ok()
        .and_then(|json| serde_json::from_str::<serde_json::Value>(&json).ok())
        .and_then(|value| value.get("config").cloned())
        .and_then(|config| serde_json::from_value::<bbat::EditorConfig>(config).ok())
        .map(|config| config.log_level)
        .unwrap_or_default();
    env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(replay::run(&path)) {
        eprintln!("Replay error: {}", e);
        std::process::exit(1);
    }
}

// WASM builds embed the library; there is no replay harness
#[cfg(target_arch = "wasm32")]
fn main() {}
