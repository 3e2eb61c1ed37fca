/// Depth and stencil comparison functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

impl CompareFunc {
    pub fn to_gl(self) -> u32 {
        match self {
            CompareFunc::Never => glow::NEVER,
            CompareFunc::Less => glow::LESS,
            CompareFunc::Equal => glow::EQUAL,
            CompareFunc::LessOrEqual => glow::LEQUAL,
            CompareFunc::Greater => glow::GREATER,
            CompareFunc::NotEqual => glow::NOTEQUAL,
            CompareFunc::GreaterOrEqual => glow::GEQUAL,
            CompareFunc::Always => glow::ALWAYS,
        }
    }

    pub fn from_gl(value: u32) -> Option<Self> {
        Some(match value {
            glow::NEVER => CompareFunc::Never,
            glow::LESS => CompareFunc::Less,
            glow::EQUAL => CompareFunc::Equal,
            glow::LEQUAL => CompareFunc::LessOrEqual,
            glow::GREATER => CompareFunc::Greater,
            glow::NOTEQUAL => CompareFunc::NotEqual,
            glow::GEQUAL => CompareFunc::GreaterOrEqual,
            glow::ALWAYS => CompareFunc::Always,
            _ => return None,
        })
    }

    /// GL semantics: `incoming <func> stored`.
    pub fn passes<T: PartialOrd>(self, incoming: T, stored: T) -> bool {
        match self {
            CompareFunc::Never => false,
            CompareFunc::Less => incoming < stored,
            CompareFunc::Equal => incoming == stored,
            CompareFunc::LessOrEqual => incoming <= stored,
            CompareFunc::Greater => incoming > stored,
            CompareFunc::NotEqual => incoming != stored,
            CompareFunc::GreaterOrEqual => incoming >= stored,
            CompareFunc::Always => true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    Increment,
    IncrementWrap,
    Decrement,
    DecrementWrap,
    Invert,
}

impl StencilOp {
    pub fn to_gl(self) -> u32 {
        match self {
            StencilOp::Keep => glow::KEEP,
            StencilOp::Zero => glow::ZERO,
            StencilOp::Replace => glow::REPLACE,
            StencilOp::Increment => glow::INCR,
            StencilOp::IncrementWrap => glow::INCR_WRAP,
            StencilOp::Decrement => glow::DECR,
            StencilOp::DecrementWrap => glow::DECR_WRAP,
            StencilOp::Invert => glow::INVERT,
        }
    }

    pub fn from_gl(value: u32) -> Option<Self> {
        Some(match value {
            glow::KEEP => StencilOp::Keep,
            glow::ZERO => StencilOp::Zero,
            glow::REPLACE => StencilOp::Replace,
            glow::INCR => StencilOp::Increment,
            glow::INCR_WRAP => StencilOp::IncrementWrap,
            glow::DECR => StencilOp::Decrement,
            glow::DECR_WRAP => StencilOp::DecrementWrap,
            glow::INVERT => StencilOp::Invert,
            _ => return None,
        })
    }

    /// New stencil value for an 8-bit buffer, before the write mask.
    pub fn apply(self, value: u8, reference: u8) -> u8 {
        match self {
            StencilOp::Keep => value,
            StencilOp::Zero => 0,
            StencilOp::Replace => reference,
            StencilOp::Increment => value.saturating_add(1),
            StencilOp::IncrementWrap => value.wrapping_add(1),
            StencilOp::Decrement => value.saturating_sub(1),
            StencilOp::DecrementWrap => value.wrapping_sub(1),
            StencilOp::Invert => !value,
        }
    }
}

/// Operations for one face orientation: (stencil fail, depth fail, both pass).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilFaceOps {
    pub stencil_fail: StencilOp,
    pub depth_fail: StencilOp,
    pub depth_pass: StencilOp,
}

impl StencilFaceOps {
    pub const KEEP: Self = Self {
        stencil_fail: StencilOp::Keep,
        depth_fail: StencilOp::Keep,
        depth_pass: StencilOp::Keep,
    };

    /// Keep on everything except a failed depth test.
    pub const fn on_depth_fail(op: StencilOp) -> Self {
        Self { depth_fail: op, ..Self::KEEP }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilState {
    pub func: CompareFunc,
    pub reference: u8,
    pub read_mask: u8,
    pub write_mask: u8,
    pub front: StencilFaceOps,
    pub back: StencilFaceOps,
}

impl StencilState {
    /// Ops for a fragment of the given orientation.
    pub fn ops(&self, facing: Facing) -> StencilFaceOps {
        match facing {
            Facing::Front => self.front,
            Facing::Back => self.back,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Front,
    Back,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CullMode {
    None,
    Front,
    Back,
}

impl CullMode {
    pub fn culls(self, facing: Facing) -> bool {
        matches!((self, facing), (CullMode::Front, Facing::Front) | (CullMode::Back, Facing::Back))
    }
}

/// Complete pipeline state for one pass, applied in a single step by
/// `GraphicsDevice::apply_raster_state`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterState {
    pub depth_test: bool,
    pub depth_func: CompareFunc,
    pub depth_write: bool,
    pub color_write: bool,
    /// `None` disables the stencil test.
    pub stencil: Option<StencilState>,
    pub cull: CullMode,
    pub depth_clamp: bool,
}

impl RasterState {
    /// State the device is left in between frames.
    pub const fn resting() -> Self {
        Self {
            depth_test: true,
            depth_func: CompareFunc::LessOrEqual,
            depth_write: true,
            color_write: true,
            stencil: None,
            cull: CullMode::None,
            depth_clamp: false,
        }
    }
}

impl Default for RasterState {
    fn default() -> Self {
        Self::resting()
    }
}
