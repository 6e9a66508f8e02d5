#![allow(dead_code)]

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};
use token_overlay::{
    AnimationScheduler, Content, ContentLoader, ContentSource, EntityId, EntityState, FilterArgs,
    FilterFactory, HookRegistry, HookService, HookTrigger, LiveStream, OverlayError, OverlayFilter,
    OverlayId, OverlayResult, PlaybackOpts, RotationRequest, SceneState, SceneView, ShapeBatch,
    Size, StreamHandle, TextureHandle,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[derive(Debug)]
pub struct StubFilter {
    pub id: String,
    pub args: FilterArgs,
    pub uniforms: Map<String, JsonValue>,
}

impl OverlayFilter for StubFilter {
    fn uniforms(&self) -> &Map<String, JsonValue> {
        &self.uniforms
    }

    fn update(&mut self, options: &Map<String, JsonValue>) {
        self.uniforms = options.clone();
    }
}

/// Recording host: every collaborator call lands in a public field.
#[derive(Default)]
pub struct FakeHost {
    next_handle: u64,
    pub loads: Vec<ContentSource>,
    pub released_textures: Vec<TextureHandle>,
    pub released_shapes: Vec<u64>,
    pub released_streams: Vec<StreamHandle>,
    pub clones: Vec<(StreamHandle, StreamHandle)>,
    pub plays: Vec<(StreamHandle, PlaybackOpts)>,
    pub stops: Vec<StreamHandle>,
    pub hooks: HookRegistry,
    pub hook_calls: usize,
    pub runs: Vec<RotationRequest>,
    pub cancels: Vec<String>,
    pub filters_built: Vec<String>,
}

impl FakeHost {
    fn handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl ContentLoader for FakeHost {
    fn load(&mut self, source: &ContentSource) -> OverlayResult<Content> {
        self.loads.push(source.clone());
        let texture = TextureHandle(self.handle());
        let size = Size::new(100.0, 50.0);
        match source {
            ContentSource::Image { path } if path == "missing.png" => {
                Err(OverlayError::content(format!("no such image '{path}'")))
            }
            ContentSource::Image { .. } => Ok(Content::image(texture, size)),
            ContentSource::Video { .. } => {
                let stream = StreamHandle(self.handle());
                Ok(Content {
                    live: Some(LiveStream::new(stream)),
                    ..Content::image(texture, size)
                })
            }
            ContentSource::Text { .. } => Ok(Content {
                exclusive: true,
                ..Content::image(texture, size)
            }),
            ContentSource::Shapes { .. } => {
                let handle = self.handle();
                Ok(Content {
                    shapes: Some(ShapeBatch {
                        handle,
                        size: Size::new(40.0, 20.0),
                    }),
                    exclusive: true,
                    ..Content::image(texture, size)
                })
            }
            ContentSource::Html { .. } => Ok(Content {
                html: true,
                ..Content::image(texture, size)
            }),
        }
    }

    fn clone_stream(&mut self, stream: StreamHandle) -> StreamHandle {
        let clone = StreamHandle(self.handle());
        self.clones.push((stream, clone));
        clone
    }

    fn texture_for_stream(&mut self, _stream: StreamHandle) -> TextureHandle {
        TextureHandle(self.handle())
    }

    fn play(&mut self, stream: StreamHandle, opts: PlaybackOpts) {
        self.plays.push((stream, opts));
    }

    fn stop(&mut self, stream: StreamHandle) {
        self.stops.push(stream);
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        self.released_textures.push(texture);
    }

    fn release_shapes(&mut self, shapes: &ShapeBatch) {
        self.released_shapes.push(shapes.handle);
    }

    fn release_stream(&mut self, stream: StreamHandle) {
        self.released_streams.push(stream);
    }
}

impl HookService for FakeHost {
    fn subscribe(&mut self, trigger: HookTrigger, overlay: OverlayId) {
        self.hook_calls += 1;
        self.hooks.subscribe(trigger, overlay);
    }

    fn unsubscribe(&mut self, trigger: HookTrigger, overlay: OverlayId) {
        self.hook_calls += 1;
        self.hooks.unsubscribe(trigger, overlay);
    }
}

impl AnimationScheduler for FakeHost {
    fn run_animation(&mut self, request: &RotationRequest) {
        self.runs.push(request.clone());
    }

    fn cancel(&mut self, name: &str) {
        self.cancels.push(name.to_owned());
    }
}

impl FilterFactory for FakeHost {
    fn construct(&mut self, id: &str, args: FilterArgs) -> Option<Box<dyn OverlayFilter>> {
        if id == "Missing" {
            return None;
        }
        self.filters_built.push(id.to_owned());
        let uniforms = match &args {
            FilterArgs::Options(m) => m.clone(),
            _ => Map::new(),
        };
        Some(Box::new(StubFilter {
            id: id.to_owned(),
            args,
            uniforms,
        }))
    }
}

/// Entity world for tests.
pub struct World {
    pub entities: BTreeMap<EntityId, EntityState>,
    pub scene: SceneState,
}

impl World {
    pub fn with_token(id: &str) -> Self {
        let mut entities = BTreeMap::new();
        entities.insert(EntityId::from(id), token(id));
        Self {
            entities,
            scene: SceneState::default(),
        }
    }

    pub fn view(&self) -> SceneView<'_> {
        SceneView::new(&self.entities, &self.scene)
    }

    pub fn token_mut(&mut self, id: &str) -> &mut EntityState {
        self.entities
            .entry(EntityId::from(id))
            .or_insert_with(|| token(id))
    }
}

pub fn token(id: &str) -> EntityState {
    EntityState {
        id: EntityId::from(id),
        x: 100.0,
        y: 100.0,
        w: 100.0,
        h: 100.0,
        ..EntityState::default()
    }
}

pub fn image(path: &str) -> ContentSource {
    ContentSource::Image {
        path: path.to_owned(),
    }
}

pub fn video(path: &str) -> ContentSource {
    ContentSource::Video {
        path: path.to_owned(),
    }
}
