//! The night-meadow scene.
//!
//! Construction builds every procedural mesh synchronously before the first
//! frame; the three tracked loads (ambience audio, the flower prop, the
//! cottage prop) are spawned from `on_init` and resolve through the gate.
//! Per-frame behaviour is entirely the coordinator's phase machine.

use cgmath::{Deg, Rad, Rotation3, Vector3};
use instant::{Duration, Instant};
use wgpu::util::DeviceExt;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use crate::{
    config,
    context::{Context, InitContext},
    coordinator::{Coordinator, UniformSet},
    data_structures::{
        instance::Instance,
        model::{Model, SceneryMesh},
    },
    flow::{LoadFuture, Mutation, Out, VignetteFlow},
    r#gen::{field, mesh, mountain},
    loading::{LoadGate, LoadStatus, LoadToken, ReadyState},
    render::{FieldBatch, Instanced, Render},
    resources::{
        self,
        texture::{field_textures_bind_group, load_texture},
        AudioClip,
    },
};

const GRASS_TEXTURE: &str = "textures/grass/grass.jpg";
const CLOUD_TEXTURE: &str = "textures/clouds/cloud.jpg";
const AUDIO_FILE: &str = "sounds/ambience.mp3";
const FLOWER_OBJ: &str = "models/maps/anemone_hybrida.obj";
const COTTAGE_OBJ: &str = "models/house/cottage_obj.obj";

/// A loaded prop with its drawn copies.
pub struct Prop {
    pub model: Model,
    pub instances: Vec<Instance>,
    pub instance_buffer: wgpu::Buffer,
}

impl Prop {
    pub fn new(device: &wgpu::Device, model: Model, instances: Vec<Instance>) -> Self {
        let instance_data = instances.iter().map(Instance::to_raw).collect::<Vec<_>>();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Prop Instance Buffer"),
            contents: bytemuck::cast_slice(&instance_data),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            model,
            instances,
            instance_buffer,
        }
    }
}

pub struct Vignette {
    field: SceneryMesh,
    field_textures: wgpu::BindGroup,
    ground: SceneryMesh,
    sky: SceneryMesh,
    ridge: SceneryMesh,
    mountains: Vec<SceneryMesh>,
    flower: Option<Prop>,
    cottage: Option<Prop>,
    audio: Option<AudioClip>,
    coordinator: Coordinator,
    gate: LoadGate,
}

impl Vignette {
    /// Build all procedural geometry and the startup textures.
    pub async fn new(init: InitContext) -> anyhow::Result<Self> {
        let device = &init.device;

        log::info!("generating grass field ({} blades)", config::BLADE_COUNT);
        let field_data = field::generate_field(
            config::BLADE_COUNT,
            config::FIELD_RADIUS,
            config::FIELD_SEED,
        )?;
        let field = SceneryMesh::upload(device, &field_data, "grass field")?;

        let ground = SceneryMesh::upload(
            device,
            &mesh::disk(config::FIELD_RADIUS, 64, -0.01, config::GROUND_COLOR),
            "ground",
        )?;
        let sky = SceneryMesh::upload(
            device,
            &mesh::uv_sphere(config::SKY_RADIUS, config::SKY_SEGMENTS, [0.0, 0.0, 0.0]),
            "sky dome",
        )?;

        log::info!(
            "generating mountain ring ({} mountains, seed {})",
            config::MOUNTAIN_COUNT,
            config::MOUNTAIN_SEED
        );
        let ridge = SceneryMesh::upload(
            device,
            &mountain::generate_ridge_ring(
                config::MOUNTAIN_SEED,
                config::RIDGE_SEGMENTS,
                config::MOUNTAIN_RING_RADIUS,
            ),
            "mountain ridge",
        )?;
        let mountains = mountain::generate_cone_ring(
            config::MOUNTAIN_SEED,
            config::MOUNTAIN_COUNT,
            config::MOUNTAIN_RING_RADIUS,
        )
        .iter()
        .enumerate()
        .map(|(i, data)| SceneryMesh::upload(device, data, &format!("mountain {i}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

        let (grass_texture, cloud_texture) = futures::try_join!(
            load_texture(GRASS_TEXTURE, device, &init.queue, None),
            load_texture(CLOUD_TEXTURE, device, &init.queue, None),
        )?;
        let field_textures = field_textures_bind_group(
            device,
            &init.field_textures_layout,
            &grass_texture,
            &cloud_texture,
        );

        Ok(Self {
            field,
            field_textures,
            ground,
            sky,
            ridge,
            mountains,
            flower: None,
            cottage: None,
            audio: None,
            coordinator: Coordinator::new(),
            gate: LoadGate::new(),
        })
    }

    /// The fetched ambience bytes, once the audio load resolved. Decoding
    /// and playback belong to the embedding UI.
    pub fn audio(&self) -> Option<&AudioClip> {
        self.audio.as_ref()
    }

    /// The flower stands by the meadow edge with two leaning clones, all
    /// sharing the same model and materials.
    fn flower_instances() -> Vec<Instance> {
        let scale = Vector3::new(3.0, 5.0, 5.0);
        let base = Instance {
            position: Vector3::new(24.0, 0.0, -3.0),
            rotation: cgmath::Quaternion::from_angle_y(Rad(-std::f32::consts::PI / 18.0)),
            scale,
        };
        let leaning = Instance {
            position: Vector3::new(24.0, 0.0, -2.0),
            rotation: cgmath::Quaternion::from_angle_y(Rad(-std::f32::consts::PI / 6.0))
                * cgmath::Quaternion::from_angle_x(Rad(-std::f32::consts::PI / 4.0)),
            scale,
        };
        let third = Instance {
            position: Vector3::new(24.0, 0.0, -1.0),
            rotation: cgmath::Quaternion::from_angle_y(Rad(-std::f32::consts::PI / 18.0)),
            scale,
        };
        vec![base, leaning, third]
    }

    fn cottage_instances() -> Vec<Instance> {
        vec![Instance {
            position: Vector3::new(0.0, 0.0, 4.0),
            rotation: cgmath::Quaternion::from_angle_y(Deg(0.8 * 180.0)),
            scale: Vector3::new(0.4, 0.4, 0.4),
        }]
    }

    fn spawn_audio_load(token: LoadToken) -> LoadFuture<Self> {
        Box::pin(async move {
            match resources::load_audio(AUDIO_FILE).await {
                Ok(clip) => Box::new(move |v: &mut Vignette| {
                    v.audio = Some(clip);
                    token.resolve(LoadStatus::Loaded);
                }) as Mutation<Self>,
                Err(e) => {
                    log::error!("audio load failed: {e}");
                    Box::new(move |_: &mut Vignette| token.resolve(LoadStatus::Failed))
                        as Mutation<Self>
                }
            }
        })
    }

    fn spawn_model_load(
        init: InitContext,
        path: &'static str,
        instances: Vec<Instance>,
        install: fn(&mut Vignette, Prop),
        token: LoadToken,
    ) -> LoadFuture<Self> {
        Box::pin(async move {
            match resources::load_model_obj(path, &init.device, &init.queue, &init.material_layout)
                .await
            {
                Ok(model) => {
                    let prop = Prop::new(&init.device, model, instances);
                    Box::new(move |v: &mut Vignette| {
                        install(v, prop);
                        token.resolve(LoadStatus::Loaded);
                    }) as Mutation<Self>
                }
                Err(e) => {
                    log::error!("model '{path}' failed to load: {e}");
                    Box::new(move |_: &mut Vignette| token.resolve(LoadStatus::Failed))
                        as Mutation<Self>
                }
            }
        })
    }
}

impl VignetteFlow for Vignette {
    fn on_init(&mut self, ctx: &mut Context) -> Out<Self> {
        let init = InitContext::from(&*ctx);

        let audio_token = self.gate.register("ambience audio");
        let flower_token = self.gate.register("flower model");
        let cottage_token = self.gate.register("cottage model");
        self.gate.seal();
        self.coordinator.begin_loading();

        Out::Load(vec![
            Self::spawn_audio_load(audio_token),
            Self::spawn_model_load(
                init.clone(),
                FLOWER_OBJ,
                Self::flower_instances(),
                |v, prop| v.flower = Some(prop),
                flower_token,
            ),
            Self::spawn_model_load(
                init,
                COTTAGE_OBJ,
                Self::cottage_instances(),
                |v, prop| v.cottage = Some(prop),
                cottage_token,
            ),
        ])
    }

    fn on_window_events(&mut self, ctx: &mut Context, event: &WindowEvent) -> Out<Self> {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    logical_key: Key::Named(NamedKey::Enter),
                    state: ElementState::Pressed,
                    ..
                },
            ..
        } = event
        {
            let now = Instant::now();
            self.coordinator.force_enter(now);
            ctx.camera.dolly.start(now);
        }
        Out::Empty
    }

    fn on_update(&mut self, ctx: &mut Context, now: Instant, dt: Duration) -> bool {
        if let Some(state) = self.coordinator.poll_gate(&self.gate, now) {
            match state {
                ReadyState::Complete => log::info!("all assets resolved; scene ready"),
                ReadyState::Degraded { failed } => {
                    log::warn!("scene ready with {failed} failed loads")
                }
            }
            ctx.camera.dolly.start(now);
        }

        let camera = &mut ctx.camera;
        self.coordinator.tick(
            now,
            dt,
            &mut camera.camera,
            &mut camera.controller,
            &mut camera.dolly,
        )
    }

    fn uniforms(&self) -> &UniformSet {
        &self.coordinator.uniforms
    }

    fn on_render(&self) -> Render<'_> {
        let mut renders = vec![
            Render::Sky(&self.sky),
            Render::Silhouettes(
                std::iter::once(&self.ground)
                    .chain(std::iter::once(&self.ridge))
                    .chain(self.mountains.iter())
                    .collect(),
            ),
            Render::Field(FieldBatch {
                mesh: &self.field,
                textures: &self.field_textures,
            }),
        ];
        for prop in [&self.flower, &self.cottage].into_iter().flatten() {
            renders.push(Render::Instanced(Instanced {
                instance: &prop.instance_buffer,
                model: &prop.model,
                amount: prop.instances.len(),
            }));
        }
        Render::Composed(renders)
    }
}
