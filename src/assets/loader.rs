use std::sync::Arc;

use base64::Engine;
use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::animation::binding::TargetPath;
use crate::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::assets::io::AssetReaderVariant;
use crate::errors::{Result, ViewerError};
use crate::scene::{MeshFlags, NodeHandle, Scene};

// ============================================================================
// Public data
// ============================================================================

/// Required extensions that can only be read with an external mesh decoder.
pub const DECODER_EXTENSIONS: [&str; 2] = ["KHR_draco_mesh_compression", "EXT_meshopt_compression"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Base path of the mesh decoder bundle. Without it, compressed assets
    /// are rejected.
    pub decoder_path: Option<String>,
}

/// Compression the renderer has to undo when uploading meshes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshCompression {
    pub extension: String,
    pub decoder_path: String,
}

/// A decoded model, ready to be installed into a viewer.
#[derive(Debug, Clone)]
pub struct SceneAsset {
    pub scene: Scene,
    /// Synthetic node parenting the asset's default scene.
    pub root: NodeHandle,
    /// Clips in asset order.
    pub clips: Vec<Arc<AnimationClip>>,
    /// Bone name → node. Skin joints first, then every other named node.
    pub bones: FxHashMap<String, NodeHandle>,
    pub compression: Option<MeshCompression>,
}

impl SceneAsset {
    #[must_use]
    pub fn bone(&self, name: &str) -> Option<NodeHandle> {
        self.bones.get(name).copied()
    }

    #[must_use]
    pub fn clip_names(&self) -> Vec<&str> {
        self.clips.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Messages posted by [`AssetLoader::spawn`].
#[derive(Debug)]
pub enum LoadMessage {
    /// Bytes fetched so far. `total` is known once every buffer is listed.
    Progress { loaded: u64, total: Option<u64> },
    Finished(Result<SceneAsset>),
}

// ============================================================================
// Loader
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    options: LoaderOptions,
}

impl AssetLoader {
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Fetches and decodes the asset at `source` (file path or http(s) URL).
    pub async fn load(&self, source: &str) -> Result<SceneAsset> {
        self.load_reporting(source, None).await
    }

    /// Decodes an in-memory glTF/GLB. External buffers resolve against `base`.
    pub async fn load_from_slice(&self, bytes: &[u8], base: &str) -> Result<SceneAsset> {
        let reader = AssetReaderVariant::from_source(base)?;
        self.decode(bytes, &reader, None).await
    }

    /// Runs [`load`](Self::load) on the asset runtime and reports through
    /// `sender`. A dropped receiver is not an error; the result is discarded.
    pub fn spawn(&self, source: impl Into<String>, sender: flume::Sender<LoadMessage>) {
        let loader = self.clone();
        let source = source.into();
        super::spawn_task(async move {
            let result = loader.load_reporting(&source, Some(&sender)).await;
            if let Err(e) = &result {
                log::error!("Failed to load '{source}': {e}");
            }
            if sender.send(LoadMessage::Finished(result)).is_err() {
                log::debug!("Load of '{source}' finished after its receiver went away");
            }
        });
    }

    async fn load_reporting(&self, source: &str, progress: Option<&flume::Sender<LoadMessage>>) -> Result<SceneAsset> {
        log::info!("Loading model '{source}'");
        let reader = AssetReaderVariant::from_source(source)?;
        let bytes = reader.read_bytes(AssetReaderVariant::source_filename(source)).await?;
        report(progress, bytes.len() as u64, None);
        self.decode(&bytes, &reader, progress).await
    }

    async fn decode(
        &self,
        bytes: &[u8],
        reader: &AssetReaderVariant,
        progress: Option<&flume::Sender<LoadMessage>>,
    ) -> Result<SceneAsset> {
        let gltf = gltf::Gltf::from_slice_without_validation(bytes)?;
        validate_document(&gltf)?;
        let compression = self.check_extensions(&gltf)?;

        let buffers = load_buffers(&gltf, reader, bytes.len() as u64, progress).await?;

        let mut scene = Scene::new();
        let (root, node_mapping) = build_hierarchy(&gltf, &mut scene);
        let bones = collect_bones(&gltf, &scene, &node_mapping);
        let clips = load_animations(&gltf, &buffers)?.into_iter().map(Arc::new).collect::<Vec<_>>();

        scene.update_matrix_world();

        log::info!(
            "Model decoded: {} nodes, {} bones, {} animations",
            scene.nodes.len(),
            bones.len(),
            clips.len()
        );

        Ok(SceneAsset {
            scene,
            root,
            clips,
            bones,
            compression,
        })
    }

    fn check_extensions(&self, gltf: &gltf::Gltf) -> Result<Option<MeshCompression>> {
        let mut compression = None;

        for ext in gltf.extensions_required() {
            if DECODER_EXTENSIONS.contains(&ext) {
                let Some(path) = self.options.decoder_path.as_ref() else {
                    return Err(ViewerError::DecoderUnavailable(ext.to_string()));
                };
                compression = Some(MeshCompression {
                    extension: ext.to_string(),
                    decoder_path: path.clone(),
                });
            } else {
                log::warn!("glTF requires extension '{ext}', which is not handled; rendering may be off");
            }
        }

        Ok(compression)
    }
}

// ============================================================================
// Decoding steps
// ============================================================================

/// Runs the glTF index and structure checks. Required extensions are left
/// to [`AssetLoader::check_extensions`], which knows about decoders.
fn validate_document(gltf: &gltf::Gltf) -> Result<()> {
    use gltf::json::validation::Validate;

    let root = gltf.document.as_json();
    let mut errors = Vec::new();
    root.validate(root, gltf::json::Path::new, &mut |path, error| {
        let path = path();
        if !path.as_str().starts_with("extensionsRequired") {
            errors.push((path, error));
        }
    });

    if errors.is_empty() {
        Ok(())
    } else {
        Err(gltf::Error::Validation(errors).into())
    }
}

fn report(progress: Option<&flume::Sender<LoadMessage>>, loaded: u64, total: Option<u64>) {
    if let Some(sender) = progress {
        let _ = sender.send(LoadMessage::Progress { loaded, total });
    }
}

async fn load_buffers(
    gltf: &gltf::Gltf,
    reader: &AssetReaderVariant,
    mut loaded: u64,
    progress: Option<&flume::Sender<LoadMessage>>,
) -> Result<Vec<Vec<u8>>> {
    let total = loaded
        + gltf
            .buffers()
            .filter(|b| matches!(b.source(), gltf::buffer::Source::Uri(uri) if !uri.starts_with("data:")))
            .map(|b| b.length() as u64)
            .sum::<u64>();

    let mut buffer_data = Vec::with_capacity(gltf.buffers().len());
    for buffer in gltf.buffers() {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .as_deref()
                .map(<[u8]>::to_vec)
                .ok_or_else(|| ViewerError::GltfError("Missing GLB binary chunk".to_string()))?,
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => decode_data_uri(uri)?,
            gltf::buffer::Source::Uri(uri) => {
                let data = reader.read_bytes(uri).await?;
                loaded += data.len() as u64;
                report(progress, loaded, Some(total));
                data
            }
        };

        if data.len() < buffer.length() {
            return Err(ViewerError::GltfError(format!(
                "Buffer {} holds {} bytes, expected {}",
                buffer.index(),
                data.len(),
                buffer.length()
            )));
        }
        buffer_data.push(data);
    }
    Ok(buffer_data)
}

/// Decodes a base64 `data:` URI into bytes.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| ViewerError::DataUriError("missing 'data:' prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ViewerError::DataUriError("missing ',' separator".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(ViewerError::DataUriError(format!("unsupported encoding '{header}'")));
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

/// Creates one scene node per glTF node and parents the default scene under a
/// synthetic root. Returns the root and the glTF index → handle table.
fn build_hierarchy(gltf: &gltf::Gltf, scene: &mut Scene) -> (NodeHandle, Vec<NodeHandle>) {
    let mut node_mapping = Vec::with_capacity(gltf.nodes().len());

    for node in gltf.nodes() {
        let name = node.name().map_or_else(|| format!("Node_{}", node.index()), str::to_string);
        let handle = scene.create_node_with_name(&name);

        if let Some(engine_node) = scene.get_node_mut(handle) {
            let (t, r, s) = node.transform().decomposed();
            engine_node.transform.position = Vec3::from_array(t);
            engine_node.transform.rotation = Quat::from_array(r);
            engine_node.transform.scale = Vec3::from_array(s);

            if node.mesh().is_some() {
                engine_node.mesh = Some(MeshFlags {
                    cast_shadow: true,
                    receive_shadow: true,
                    frustum_culled: false,
                    skinned: node.skin().is_some(),
                });
            }
        }
        node_mapping.push(handle);
    }

    let root = scene.create_node_with_name("gltf_root");
    scene.root_nodes.push(root);

    for node in gltf.nodes() {
        let parent = node_mapping[node.index()];
        for child in node.children() {
            scene.attach(node_mapping[child.index()], parent);
        }
    }

    if let Some(default_scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) {
        for node in default_scene.nodes() {
            scene.attach(node_mapping[node.index()], root);
        }
    }

    (root, node_mapping)
}

fn collect_bones(gltf: &gltf::Gltf, scene: &Scene, node_mapping: &[NodeHandle]) -> FxHashMap<String, NodeHandle> {
    let mut bones = FxHashMap::default();

    for skin in gltf.skins() {
        for joint in skin.joints() {
            let handle = node_mapping[joint.index()];
            if let Some(node) = scene.get_node(handle) {
                bones.entry(node.name.clone()).or_insert(handle);
            }
        }
    }

    for node in gltf.nodes() {
        if let Some(name) = node.name() {
            bones.entry(name.to_string()).or_insert(node_mapping[node.index()]);
        }
    }

    bones
}

fn load_animations(gltf: &gltf::Gltf, buffers: &[Vec<u8>]) -> Result<Vec<AnimationClip>> {
    use gltf::animation::util::ReadOutputs;

    let mut animations = Vec::with_capacity(gltf.animations().len());

    for anim in gltf.animations() {
        let clip_name = anim.name().map_or_else(|| format!("Animation_{}", anim.index()), str::to_string);
        let mut tracks = Vec::new();

        for channel in anim.channels() {
            let reader = channel.reader(|b| buffers.get(b.index()).map(Vec::as_slice));
            let target = channel.target();
            let gltf_node = target.node();
            let node_name = gltf_node.name().map_or_else(|| format!("Node_{}", gltf_node.index()), str::to_string);

            let (Some(inputs), Some(outputs)) = (reader.read_inputs(), reader.read_outputs()) else {
                return Err(ViewerError::GltfError(format!(
                    "Animation '{clip_name}': channel on '{node_name}' has unreadable sampler data"
                )));
            };
            let times: Vec<f32> = inputs.collect();

            let interpolation = match channel.sampler().interpolation() {
                gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
                gltf::animation::Interpolation::Step => InterpolationMode::Step,
                gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
            };

            let (target, data) = match outputs {
                ReadOutputs::Translations(iter) => (
                    TargetPath::Translation,
                    TrackData::Vector3(KeyframeTrack::new(times, iter.map(Vec3::from_array).collect(), interpolation)),
                ),
                ReadOutputs::Rotations(iter) => (
                    TargetPath::Rotation,
                    TrackData::Quaternion(KeyframeTrack::new(
                        times,
                        iter.into_f32().map(Quat::from_array).collect(),
                        interpolation,
                    )),
                ),
                ReadOutputs::Scales(iter) => (
                    TargetPath::Scale,
                    TrackData::Vector3(KeyframeTrack::new(times, iter.map(Vec3::from_array).collect(), interpolation)),
                ),
                ReadOutputs::MorphTargetWeights(_) => {
                    log::debug!("Animation '{clip_name}': morph weights on '{node_name}' skipped");
                    continue;
                }
            };

            tracks.push(Track {
                meta: TrackMeta { node_name, target },
                data,
            });
        }

        animations.push(AnimationClip::new(clip_name, tracks));
    }

    Ok(animations)
}
