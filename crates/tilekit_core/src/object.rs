//! Shapes placed on object, collision, navigation and trigger layers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Position, rotation and scale of a placed object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectTransform {
    /// Position in pixels
    pub position: [f32; 2],
    /// Rotation in degrees, clockwise
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "default_scale")]
    pub scale: [f32; 2],
}

fn default_scale() -> [f32; 2] {
    [1.0, 1.0]
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0],
            rotation: 0.0,
            scale: default_scale(),
        }
    }
}

impl ObjectTransform {
    pub fn at(position: [f32; 2]) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Geometry of an object, in local space relative to its transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectShape {
    Point,
    Rectangle { width: f32, height: f32 },
    Ellipse { width: f32, height: f32 },
    /// Closed outline; the last point connects back to the first
    Polygon { points: Vec<[f32; 2]> },
}

impl ObjectShape {
    pub fn is_polygon(&self) -> bool {
        matches!(self, ObjectShape::Polygon { .. })
    }
}

/// A shape-based object living on a non-tile layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub id: Uuid,
    pub name: String,
    pub shape: ObjectShape,
    #[serde(default)]
    pub transform: ObjectTransform,
    /// Free-form properties; trigger layers use `"event"` for the fired event name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, String>,
}

impl MapObject {
    /// Create an object with a fresh id
    pub fn new(name: impl Into<String>, shape: ObjectShape, transform: ObjectTransform) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            shape,
            transform,
            properties: HashMap::new(),
        }
    }

    /// Create a polygon object from an outline
    pub fn polygon(name: impl Into<String>, points: Vec<[f32; 2]>) -> Self {
        Self::new(name, ObjectShape::Polygon { points }, ObjectTransform::default())
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Polygon outline, if this object is a polygon
    pub fn polygon_points(&self) -> Option<&[[f32; 2]]> {
        match &self.shape {
            ObjectShape::Polygon { points } => Some(points),
            _ => None,
        }
    }

    /// Replace the polygon outline. Ignored for non-polygon shapes.
    pub fn set_polygon_points(&mut self, new_points: Vec<[f32; 2]>) -> bool {
        match &mut self.shape {
            ObjectShape::Polygon { points } => {
                *points = new_points;
                true
            }
            _ => false,
        }
    }
}
