//! # Frame Geometry
//!
//! The read-only layout table: for every frame variant and face slot, the
//! pixel geometry of one face. It says where the title bar, art box, type
//! line, rules box and credits line sit, and how the face maps onto the
//! card.
//!
//! A [`LayoutSpec`] is built once at startup from the size class and then
//! passed explicitly into the frame renderer and the text fitter; nothing
//! here is global or mutable.
//!
//! Coordinates are face-local: every face is described upright, and
//! [`FacePlacement`] carries the exact pixel transform onto the card.
//! Split halves live in a quarter-turned half canvas, the flipped half of
//! a flip card is the same stack upside down, and an adventure's second
//! part is a small upright canvas nested inside the main rules box.

use crate::model::FrameVariant;

/// Cards are rendered at print resolution.
pub const DPI: u32 = 300;
/// Standard card: 2.5in x 3.5in.
pub const CARD_W: i32 = 750;
pub const CARD_H: i32 = 1050;
/// Playtest card: 2in wide, same height.
pub const CARD_W_PLAYTEST: i32 = 600;

pub const BORDER_THICKNESS: i32 = 5;
/// Inner margin between frame lines and content.
pub const SEPARATOR: i32 = 15;
pub const ICON_SIZE: i32 = 40;
/// Square backdrop glyph on basic lands and emblems.
pub const BACKDROP_SIZE: i32 = 600;
/// Height of the ellipse whose top arc caps a token title bar.
pub const TOKEN_ARC_HEIGHT: i32 = 600;

pub const TITLE_BAND: i32 = 90;
pub const TYPE_BAND: i32 = 55;
pub const CREDITS_BAND: i32 = 55;
pub const PT_BOX_W: i32 = 160;
pub const PT_BOX_H: i32 = 60;

pub const TITLE_FONT_SIZE: f32 = 60.0;
pub const TYPE_FONT_SIZE: f32 = 50.0;
pub const RULES_FONT_SIZE: f32 = 40.0;
pub const CREDITS_FONT_SIZE: f32 = 30.0;
pub const CREDITS_FONT_SIZE_PLAYTEST: f32 = 23.0;

/// Output scale preset. Small renders at standard size and is scaled down
/// at pagination time; playtest is a genuinely narrower card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Standard,
    Small,
    Playtest,
}

impl SizeClass {
    fn card_width(self) -> i32 {
        match self {
            SizeClass::Playtest => CARD_W_PLAYTEST,
            _ => CARD_W,
        }
    }
}

/// A horizontal band of the face: top edge and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub top: i32,
    pub height: i32,
}

impl Band {
    pub fn bottom(self) -> i32 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// How a face's upright coordinate system maps onto the card bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacePlacement {
    /// Identity plus translation.
    Upright { x: i32, y: i32 },
    /// Quarter turn for split-style halves: a face point (x, y) lands on
    /// card point (card_width - y, offset + x).
    Quarter { offset: i32 },
    /// The flipped half of a flip card: (x, y) lands on
    /// (card_width - x, card_height - y).
    UpsideDown,
}

/// Complete geometry for one face.
#[derive(Debug, Clone)]
pub struct FaceLayout {
    pub width: i32,
    pub height: i32,
    pub placement: FacePlacement,
    pub title: Band,
    pub art: Band,
    pub type_line: Band,
    pub rules: Band,
    pub credits: Band,
    /// Horizontal extent of the rules box; narrower than the face only
    /// for the main part of an adventure.
    pub rules_x: i32,
    pub rules_w: i32,
    /// Bar for the shared fuse reminder, below the rules box.
    pub fuse: Option<Band>,
    pub pt_box: IRect,
    pub icon_center: (i32, i32),
    /// Where the land/emblem backdrop glyph goes, when the variant has one.
    pub backdrop: Option<IRect>,
    /// Tokens and emblems cap the title bar with an arc.
    pub token_arc: bool,
    pub has_credits: bool,
    pub has_icon_slot: bool,
}

/// The static layout table, sized for one size class. Built once, passed
/// by reference everywhere.
#[derive(Debug, Clone)]
pub struct LayoutSpec {
    pub size_class: SizeClass,
    pub card_width: i32,
    pub card_height: i32,
}

impl LayoutSpec {
    pub fn new(size_class: SizeClass) -> LayoutSpec {
        LayoutSpec {
            size_class,
            card_width: size_class.card_width(),
            card_height: CARD_H,
        }
    }

    pub fn credits_font_size(&self) -> f32 {
        match self.size_class {
            SizeClass::Playtest => CREDITS_FONT_SIZE_PLAYTEST,
            _ => CREDITS_FONT_SIZE,
        }
    }

    /// Geometry for face `ix` of the given variant. `ix` is 0 except for
    /// the second half of two-part variants.
    pub fn face(&self, variant: FrameVariant, ix: usize) -> FaceLayout {
        let w = self.card_width;
        let h = self.card_height;
        match variant {
            FrameVariant::Split | FrameVariant::Fuse => {
                let rules_h = if variant == FrameVariant::Fuse { 230 } else { 280 };
                let mut face = self.build_face(
                    h / 2,
                    w,
                    FacePlacement::Quarter {
                        offset: ix as i32 * (h / 2),
                    },
                    rules_h,
                    true,
                    false,
                );
                if variant == FrameVariant::Fuse {
                    face.fuse = Some(Band {
                        top: face.rules.bottom(),
                        height: 50,
                    });
                }
                face
            }
            FrameVariant::Aftermath => {
                if ix == 0 {
                    self.build_face(w, h / 2, FacePlacement::Upright { x: 0, y: 0 }, 175, true, false)
                } else {
                    // The lower half is read sideways, exactly like a
                    // split half.
                    self.build_face(
                        h / 2,
                        w,
                        FacePlacement::Quarter { offset: h / 2 },
                        280,
                        true,
                        false,
                    )
                }
            }
            FrameVariant::Adventure => {
                if ix == 0 {
                    let mut face =
                        self.build_face(w, h, FacePlacement::Upright { x: 0, y: 0 }, 303, true, false);
                    // The adventure part takes the left half of the rules
                    // box, so the main rules live in the right half.
                    face.rules_w = face.rules_w / 2;
                    face.rules_x = w - face.rules_w;
                    face.pt_box = self.pt_box(face.rules_x + face.rules_w, face.credits.bottom());
                    face
                } else {
                    let parent = self.face(FrameVariant::Adventure, 0);
                    let title = TITLE_BAND + BORDER_THICKNESS - 1;
                    let height = title + TYPE_BAND + (303 - TITLE_BAND - TYPE_BAND);
                    let mut face = self.build_face(
                        w / 2,
                        height,
                        FacePlacement::Upright {
                            x: 0,
                            y: parent.rules.top - (BORDER_THICKNESS - 1),
                        },
                        303 - TITLE_BAND - TYPE_BAND,
                        false,
                        false,
                    );
                    face.title.height = title;
                    face.art = Band {
                        top: face.title.bottom(),
                        height: 0,
                    };
                    face.type_line = Band {
                        top: face.art.bottom(),
                        height: TYPE_BAND,
                    };
                    face.rules = Band {
                        top: face.type_line.bottom(),
                        height: 303 - TITLE_BAND - TYPE_BAND,
                    };
                    face.credits = Band {
                        top: face.rules.bottom(),
                        height: 0,
                    };
                    face.has_icon_slot = false;
                    face
                }
            }
            FrameVariant::Flip => {
                let placement = if ix == 0 {
                    FacePlacement::Upright { x: 0, y: 0 }
                } else {
                    FacePlacement::UpsideDown
                };
                self.build_flip_face(w, h, placement)
            }
            FrameVariant::Token | FrameVariant::Emblem => {
                let mut face =
                    self.build_face(w, h, FacePlacement::Upright { x: 0, y: 0 }, 250, true, true);
                if variant == FrameVariant::Emblem {
                    face.backdrop = Some(self.backdrop_rect(&face));
                }
                face
            }
            FrameVariant::TextlessToken => {
                self.build_face(w, h, FacePlacement::Upright { x: 0, y: 0 }, 0, true, true)
            }
            FrameVariant::Land => {
                let mut face =
                    self.build_face(w, h, FacePlacement::Upright { x: 0, y: 0 }, 0, true, false);
                face.backdrop = Some(self.backdrop_rect(&face));
                face
            }
            FrameVariant::TextlessCreature => {
                self.build_face(w, h, FacePlacement::Upright { x: 0, y: 0 }, 0, true, false)
            }
            _ => self.build_face(w, h, FacePlacement::Upright { x: 0, y: 0 }, 303, true, false),
        }
    }

    /// The standard stack: title, art, type line, rules, credits, with the
    /// art box absorbing whatever the fixed bands leave over.
    fn build_face(
        &self,
        width: i32,
        height: i32,
        placement: FacePlacement,
        rules_h: i32,
        has_credits: bool,
        token_arc: bool,
    ) -> FaceLayout {
        let credits_h = if has_credits { CREDITS_BAND } else { 0 };
        let title = Band {
            top: 0,
            height: TITLE_BAND,
        };
        let art = Band {
            top: title.bottom(),
            height: height - TITLE_BAND - TYPE_BAND - rules_h - credits_h,
        };
        let type_line = Band {
            top: art.bottom(),
            height: TYPE_BAND,
        };
        let rules = Band {
            top: type_line.bottom(),
            height: rules_h,
        };
        let credits = Band {
            top: rules.bottom(),
            height: credits_h,
        };
        FaceLayout {
            width,
            height,
            placement,
            title,
            art,
            type_line,
            rules,
            credits,
            rules_x: 0,
            rules_w: width,
            fuse: None,
            pt_box: self.pt_box(width, credits.bottom()),
            icon_center: (width - SEPARATOR - ICON_SIZE / 2, type_line.top + TYPE_BAND / 2),
            backdrop: None,
            token_arc,
            has_credits,
            has_icon_slot: true,
        }
    }

    /// Flip faces stack title, type, rules and credits together at the
    /// top, with the art box shared between the two orientations in the
    /// middle of the card.
    fn build_flip_face(&self, width: i32, height: i32, placement: FacePlacement) -> FaceLayout {
        let rules_h = 200;
        let title = Band {
            top: 0,
            height: TITLE_BAND,
        };
        let type_line = Band {
            top: title.bottom(),
            height: TYPE_BAND,
        };
        let rules = Band {
            top: type_line.bottom(),
            height: rules_h,
        };
        let credits = Band {
            top: rules.bottom(),
            height: CREDITS_BAND,
        };
        let stack = TITLE_BAND + TYPE_BAND + rules_h + CREDITS_BAND;
        let art = Band {
            top: credits.bottom(),
            height: height - 2 * stack,
        };
        FaceLayout {
            width,
            height,
            placement,
            title,
            art,
            type_line,
            rules,
            credits,
            rules_x: 0,
            rules_w: width,
            fuse: None,
            pt_box: self.pt_box(width, credits.bottom()),
            icon_center: (width - SEPARATOR - ICON_SIZE / 2, type_line.top + TYPE_BAND / 2),
            backdrop: None,
            token_arc: false,
            has_credits: true,
            has_icon_slot: true,
        }
    }

    fn pt_box(&self, right: i32, bottom: i32) -> IRect {
        IRect {
            x: right - SEPARATOR - PT_BOX_W,
            y: bottom - PT_BOX_H,
            w: PT_BOX_W,
            h: PT_BOX_H,
        }
    }

    fn backdrop_rect(&self, face: &FaceLayout) -> IRect {
        IRect {
            x: (face.width - BACKDROP_SIZE) / 2,
            y: face.art.top + (face.art.height - BACKDROP_SIZE) / 2,
            w: BACKDROP_SIZE,
            h: BACKDROP_SIZE,
        }
    }
}

impl FacePlacement {
    /// The affine map from face coordinates to card coordinates, as a
    /// tiny-skia transform.
    pub fn transform(self, card_width: i32, card_height: i32) -> tiny_skia::Transform {
        match self {
            FacePlacement::Upright { x, y } => {
                tiny_skia::Transform::from_translate(x as f32, y as f32)
            }
            FacePlacement::Quarter { offset } => tiny_skia::Transform::from_row(
                0.0,
                1.0,
                -1.0,
                0.0,
                card_width as f32,
                offset as f32,
            ),
            FacePlacement::UpsideDown => tiny_skia::Transform::from_row(
                -1.0,
                0.0,
                0.0,
                -1.0,
                card_width as f32,
                card_height as f32,
            ),
        }
    }
}
