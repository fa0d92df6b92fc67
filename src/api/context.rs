//! Borrow context - the value describing a single borrow request.
//!
//! A [`PoolableContext`] is built by the caller before `get` and copied into
//! the instance. The core never interprets placement or tag data, it only
//! carries them to the adapter.

/// Identifier of an external grouping (scene node, layer, parent entity)
/// that a pooled instance attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

impl ScopeId {
    /// Wrap a host-side scope identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw identifier.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// RGBA colour passed through to adapters uninterpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Create a colour from its four channels.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

/// Position, orientation and scale applied to an instance on borrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// World-space position.
    pub position: [f32; 3],
    /// World-space rotation as an `[x, y, z, w]` quaternion.
    pub rotation: [f32; 4],
    /// Local scale. A zero vector means "unset".
    pub scale: [f32; 3],
}

impl Placement {
    /// Identity rotation.
    pub const IDENTITY: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    /// Unit scale.
    pub const UNIT_SCALE: [f32; 3] = [1.0, 1.0, 1.0];

    /// Placement at `position` with `rotation` and unit scale.
    pub const fn new(position: [f32; 3], rotation: [f32; 4]) -> Self {
        Self {
            position,
            rotation,
            scale: Self::UNIT_SCALE,
        }
    }

    /// The placement as applied to an instance: an unset scale becomes unit
    /// scale.
    pub fn normalized(self) -> Self {
        if self.scale == [0.0; 3] {
            Self {
                scale: Self::UNIT_SCALE,
                ..self
            }
        } else {
            self
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new([0.0; 3], Self::IDENTITY)
    }
}

/// Context passed when borrowing a pooled instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolableContext {
    /// Lifetime in seconds. Negative means infinite: the instance is only
    /// returned manually.
    pub lifetime: f32,
    /// Where the instance is placed.
    pub placement: Placement,
    /// Scope to attach to; `None` means the provider's pool scope.
    pub scope: Option<ScopeId>,
    /// Optional colour for the adapter.
    pub tag: Option<Color>,
}

impl PoolableContext {
    /// Lifetime value meaning "return manually".
    pub const INFINITE: f32 = -1.0;

    /// Context with infinite lifetime.
    pub fn infinite(position: [f32; 3], rotation: [f32; 4]) -> Self {
        Self::finite(Self::INFINITE, position, rotation)
    }

    /// Context that auto-returns after `lifetime` seconds.
    pub fn finite(lifetime: f32, position: [f32; 3], rotation: [f32; 4]) -> Self {
        Self {
            lifetime,
            placement: Placement::new(position, rotation),
            scope: None,
            tag: None,
        }
    }

    /// Builder pattern: set the colour tag.
    pub fn with_color(mut self, color: Color) -> Self {
        self.tag = Some(color);
        self
    }

    /// Builder pattern: attach to `scope` instead of the pool scope.
    pub fn with_scope(mut self, scope: ScopeId) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Builder pattern: set the scale.
    pub fn with_scale(mut self, scale: [f32; 3]) -> Self {
        self.placement.scale = scale;
        self
    }

    /// Check whether this context never auto-returns.
    pub fn is_infinite(&self) -> bool {
        self.lifetime < 0.0
    }
}

impl Default for PoolableContext {
    fn default() -> Self {
        Self::infinite([0.0; 3], Placement::IDENTITY)
    }
}

/// The placement and scope currently applied to an instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub placement: Placement,
    pub scope: ScopeId,
}

impl Transform {
    /// Default placement attached to `scope`.
    pub fn in_scope(scope: ScopeId) -> Self {
        Self {
            placement: Placement::default(),
            scope,
        }
    }
}
