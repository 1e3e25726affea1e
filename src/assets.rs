//! Asset cache: textures, entity configs, and animation templates.
//!
//! One cache is created at startup and threaded explicitly into everything
//! that loads data; its lifetime is the engine's lifetime. Textures are
//! referred to by `TextureId` everywhere
//! past this module, which keeps texture lifetimes out of the render and
//! gameplay types.
//!
//! All loading happens during startup (state push); a missing file, a missing
//! key, or a malformed value aborts with an [`AssetError`]. Nothing in the
//! per-tick path loads or validates.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::rc::Rc;

use sdl2::image::LoadTexture;
use sdl2::rect::Rect;
use sdl2::render::{Texture, TextureCreator};
use sdl2::video::WindowContext;
use serde::Deserialize;

use crate::animation::{Animation, SubImage};

/// Cheap copyable reference to a cached texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(usize);

impl TextureId {
    #[cfg(test)]
    pub fn for_tests(index: usize) -> Self {
        TextureId(index)
    }
}

#[derive(Debug)]
pub enum AssetError {
    Io { path: String, message: String },
    Parse { path: String, message: String },
    Texture { path: String, message: String },
    MissingKey { path: String, key: String },
    WrongType { path: String, key: String, expected: &'static str },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io { path, message } => {
                write!(f, "failed to read {}: {}", path, message)
            }
            AssetError::Parse { path, message } => {
                write!(f, "failed to parse {}: {}", path, message)
            }
            AssetError::Texture { path, message } => {
                write!(f, "failed to load texture {}: {}", path, message)
            }
            AssetError::MissingKey { path, key } => {
                write!(f, "{}: missing key '{}'", path, key)
            }
            AssetError::WrongType {
                path,
                key,
                expected,
            } => {
                write!(f, "{}: key '{}' is not a {}", path, key, expected)
            }
        }
    }
}

impl Error for AssetError {}

/// A parsed entity config: a flat JSON object queried with typed lookups.
pub struct ConfigFile {
    path: String,
    values: serde_json::Map<String, serde_json::Value>,
}

impl ConfigFile {
    pub fn load(path: &str) -> Result<Self, AssetError> {
        let text = fs::read_to_string(path).map_err(|e| AssetError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_str(path, &text)
    }

    fn from_str(path: &str, text: &str) -> Result<Self, AssetError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| AssetError::Parse {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        match value {
            serde_json::Value::Object(values) => Ok(ConfigFile {
                path: path.to_string(),
                values,
            }),
            _ => Err(AssetError::Parse {
                path: path.to_string(),
                message: "expected a top-level object".to_string(),
            }),
        }
    }

    fn value(&self, key: &str) -> Result<&serde_json::Value, AssetError> {
        self.values.get(key).ok_or_else(|| AssetError::MissingKey {
            path: self.path.clone(),
            key: key.to_string(),
        })
    }

    pub fn get_f32(&self, key: &str) -> Result<f32, AssetError> {
        self.value(key)?
            .as_f64()
            .map(|v| v as f32)
            .ok_or_else(|| AssetError::WrongType {
                path: self.path.clone(),
                key: key.to_string(),
                expected: "number",
            })
    }

    pub fn get_i32(&self, key: &str) -> Result<i32, AssetError> {
        self.value(key)?
            .as_i64()
            .map(|v| v as i32)
            .ok_or_else(|| AssetError::WrongType {
                path: self.path.clone(),
                key: key.to_string(),
                expected: "integer",
            })
    }

    pub fn get_str(&self, key: &str) -> Result<&str, AssetError> {
        self.value(key)?
            .as_str()
            .ok_or_else(|| AssetError::WrongType {
                path: self.path.clone(),
                key: key.to_string(),
                expected: "string",
            })
    }
}

/// On-disk shape of an animation config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
    pub frame_time: f32,
    #[serde(default = "default_looping")]
    pub looping: bool,
    pub frames: Vec<FrameConfig>,
}

fn default_looping() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrameConfig {
    pub texture: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    /// Omitted width/height select the whole texture.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

pub struct AssetCache<'tex> {
    texture_creator: &'tex TextureCreator<WindowContext>,
    textures: Vec<Texture<'tex>>,
    texture_ids: HashMap<String, TextureId>,
    configs: HashMap<String, Rc<ConfigFile>>,
    animations: HashMap<String, Animation>,
}

impl<'tex> AssetCache<'tex> {
    pub fn new(texture_creator: &'tex TextureCreator<WindowContext>) -> Self {
        AssetCache {
            texture_creator,
            textures: Vec::new(),
            texture_ids: HashMap::new(),
            configs: HashMap::new(),
            animations: HashMap::new(),
        }
    }

    /// Loads a texture once; later calls for the same path hit the cache.
    pub fn load_texture(&mut self, path: &str) -> Result<TextureId, AssetError> {
        if let Some(&id) = self.texture_ids.get(path) {
            return Ok(id);
        }
        let texture = self
            .texture_creator
            .load_texture(path)
            .map_err(|message| AssetError::Texture {
                path: path.to_string(),
                message,
            })?;
        let id = TextureId(self.textures.len());
        self.textures.push(texture);
        self.texture_ids.insert(path.to_string(), id);
        Ok(id)
    }

    /// Ids are only minted by this cache, so lookups cannot dangle.
    pub fn texture(&self, id: TextureId) -> &Texture<'tex> {
        &self.textures[id.0]
    }

    pub fn texture_mut(&mut self, id: TextureId) -> &mut Texture<'tex> {
        &mut self.textures[id.0]
    }

    pub fn texture_size(&self, id: TextureId) -> (u32, u32) {
        let query = self.textures[id.0].query();
        (query.width, query.height)
    }

    /// Loads and caches an entity config file.
    pub fn config(&mut self, path: &str) -> Result<Rc<ConfigFile>, AssetError> {
        if let Some(config) = self.configs.get(path) {
            return Ok(Rc::clone(config));
        }
        let config = Rc::new(ConfigFile::load(path)?);
        println!("Loaded config {}", path);
        self.configs.insert(path.to_string(), Rc::clone(&config));
        Ok(config)
    }

    /// Returns a fresh playback cursor for the animation described by `path`.
    /// The template is built once; every call clones it, so all instances
    /// share one frame list.
    pub fn animation(&mut self, path: &str) -> Result<Animation, AssetError> {
        if let Some(template) = self.animations.get(path) {
            return Ok(template.clone_frames());
        }

        let text = fs::read_to_string(path).map_err(|e| AssetError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let config: AnimationConfig =
            serde_json::from_str(&text).map_err(|e| AssetError::Parse {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let mut frames = Vec::with_capacity(config.frames.len());
        for frame in &config.frames {
            let texture = self.load_texture(&frame.texture)?;
            let rect = match (frame.width, frame.height) {
                (Some(width), Some(height)) => Rect::new(frame.x, frame.y, width, height),
                _ => {
                    let (width, height) = self.texture_size(texture);
                    Rect::new(0, 0, width, height)
                }
            };
            frames.push(SubImage { texture, rect });
        }

        let template = Animation::new(frames, config.frame_time, config.looping);
        println!("Loaded animation {} ({} frames)", path, config.frames.len());
        let instance = template.clone_frames();
        self.animations.insert(path.to_string(), template);
        Ok(instance)
    }
}
