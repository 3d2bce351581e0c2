// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flex container parameters.
//!
//! [`FlexStyle`] is the full set of inputs a container contributes to its
//! layout pass. Keyword enums parse from the attribute spellings used by the
//! scene markup (`space-between`, `flex-start`, ...), and numeric settings
//! are sanitized rather than rejected: anything negative or not finite
//! becomes `0` and leaves a [`Diagnostic`] behind.
//!
//! # Alignment policy
//!
//! `align_items` and `align_content` are both honored. `align_content`
//! distributes whole lines inside the container's content box, which only has
//! free cross-axis space when `min_height` exceeds the content height.
//! `align_items` then positions each item inside its line. Both default to
//! [`start`](AlignItems::Start).

use alloc::string::ToString;
use alloc::vec::Vec;
use core::str::FromStr;

use kurbo::Size;
use taffy::style::{Dimension, LengthPercentage};

use crate::error::StyleError;
use crate::trace::{Diagnostic, DiagnosticKind, Subject};

/// Main axis and direction of a container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FlexDirection {
    /// Left to right, wrapping downwards.
    #[default]
    Row,
    /// Top to bottom.
    Column,
    /// Right to left, wrapping downwards.
    RowReverse,
    /// Bottom to top.
    ColumnReverse,
}

/// Distribution of free main-axis space within a line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JustifyContent {
    /// Pack items toward the main-start edge.
    #[default]
    Start,
    /// Center items.
    Center,
    /// Pack items toward the main-end edge.
    End,
    /// Equal space around each item (half-size at the edges).
    SpaceAround,
    /// Equal space between items, none at the edges.
    SpaceBetween,
    /// Equal space between items and at the edges.
    SpaceEvenly,
}

/// Cross-axis alignment of items within their line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlignItems {
    /// Align to the cross-start edge of the line.
    #[default]
    Start,
    /// Center within the line.
    Center,
    /// Align to the cross-end edge of the line.
    End,
    /// Stretch items without a definite cross size to fill the line.
    Stretch,
}

/// Cross-axis distribution of lines within the container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AlignContent {
    /// Pack lines toward the cross-start edge.
    #[default]
    Start,
    /// Center lines.
    Center,
    /// Pack lines toward the cross-end edge.
    End,
    /// Grow lines to fill the container.
    Stretch,
    /// Equal space around each line.
    SpaceAround,
    /// Equal space between lines.
    SpaceBetween,
    /// Equal space between lines and at the edges.
    SpaceEvenly,
}

/// How a container's width is resolved against the space offered to it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ContainerWidth {
    /// Take all of the offered width.
    #[default]
    Fill,
    /// Take a fraction (`0.0..`) of the offered width.
    Fraction(f64),
    /// A fixed width, ignoring the offered width.
    Fixed(f64),
}

impl ContainerWidth {
    /// Resolves the width against `available`.
    #[must_use]
    pub fn resolve(self, available: f64) -> f64 {
        match self {
            Self::Fill => available,
            Self::Fraction(f) => available * f,
            Self::Fixed(w) => w,
        }
    }

    fn dimension(self) -> Dimension {
        match self {
            Self::Fill => Dimension::percent(1.0),
            Self::Fraction(f) => Dimension::percent(to_f32(f)),
            Self::Fixed(w) => Dimension::length(to_f32(w)),
        }
    }
}

macro_rules! keyword_enum {
    ($ty:ident, $attr:literal, { $($($kw:literal)|+ => $variant:ident),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = StyleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($($kw)|+ => Ok(Self::$variant),)+
                    other => Err(StyleError::UnknownValue {
                        attribute: $attr,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

keyword_enum!(FlexDirection, "direction", {
    "row" => Row,
    "column" => Column,
    "row-reverse" => RowReverse,
    "column-reverse" => ColumnReverse,
});

keyword_enum!(JustifyContent, "justify-content", {
    "start" | "flex-start" => Start,
    "center" => Center,
    "end" | "flex-end" => End,
    "space-around" => SpaceAround,
    "space-between" => SpaceBetween,
    "space-evenly" => SpaceEvenly,
});

keyword_enum!(AlignItems, "align-items", {
    "start" | "flex-start" => Start,
    "center" => Center,
    "end" | "flex-end" => End,
    "stretch" => Stretch,
});

keyword_enum!(AlignContent, "align-content", {
    "start" | "flex-start" => Start,
    "center" => Center,
    "end" | "flex-end" => End,
    "stretch" => Stretch,
    "space-around" => SpaceAround,
    "space-between" => SpaceBetween,
    "space-evenly" => SpaceEvenly,
});

/// All layout parameters of a flex container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlexStyle {
    /// Main axis and direction.
    pub direction: FlexDirection,
    /// Free-space distribution along the main axis.
    pub justify_content: JustifyContent,
    /// Item alignment within a line.
    pub align_items: AlignItems,
    /// Line distribution within the container.
    pub align_content: AlignContent,
    /// Whether items wrap onto new lines.
    pub wrap: bool,
    /// Space between items and between lines.
    pub gap: f64,
    /// Inset of the padding box on every side.
    pub padding: f64,
    /// Lower bound for the container's height.
    pub min_height: f64,
    /// Width resolution.
    pub width: ContainerWidth,
}

impl Default for FlexStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl FlexStyle {
    /// A wrapping row with no gap, padding, or minimum height.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            direction: FlexDirection::Row,
            justify_content: JustifyContent::Start,
            align_items: AlignItems::Start,
            align_content: AlignContent::Start,
            wrap: true,
            gap: 0.0,
            padding: 0.0,
            min_height: 0.0,
            width: ContainerWidth::Fill,
        }
    }

    /// Sets [`direction`](Self::direction).
    #[must_use]
    pub const fn with_direction(mut self, direction: FlexDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Sets [`justify_content`](Self::justify_content).
    #[must_use]
    pub const fn with_justify_content(mut self, justify: JustifyContent) -> Self {
        self.justify_content = justify;
        self
    }

    /// Sets [`align_items`](Self::align_items).
    #[must_use]
    pub const fn with_align_items(mut self, align: AlignItems) -> Self {
        self.align_items = align;
        self
    }

    /// Sets [`align_content`](Self::align_content).
    #[must_use]
    pub const fn with_align_content(mut self, align: AlignContent) -> Self {
        self.align_content = align;
        self
    }

    /// Sets [`wrap`](Self::wrap).
    #[must_use]
    pub const fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Sets [`gap`](Self::gap).
    #[must_use]
    pub const fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    /// Sets [`padding`](Self::padding).
    #[must_use]
    pub const fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Sets [`min_height`](Self::min_height).
    #[must_use]
    pub const fn with_min_height(mut self, min_height: f64) -> Self {
        self.min_height = min_height;
        self
    }

    /// Sets [`width`](Self::width).
    #[must_use]
    pub const fn with_width(mut self, width: ContainerWidth) -> Self {
        self.width = width;
        self
    }

    /// Returns a copy with every numeric setting made safe to lay out.
    ///
    /// Negative or non-finite `gap`, `padding`, and `min_height` become `0`.
    /// A negative or non-finite width fraction or fixed width falls back to
    /// [`ContainerWidth::Fill`]. One diagnostic is pushed per clamped
    /// setting.
    #[must_use]
    pub fn sanitized(mut self, subject: Subject, diagnostics: &mut Vec<Diagnostic>) -> Self {
        for (field, value) in [
            ("gap", &mut self.gap),
            ("padding", &mut self.padding),
            ("min-height", &mut self.min_height),
        ] {
            if !(value.is_finite() && *value >= 0.0) {
                diagnostics.push(
                    Diagnostic::new(DiagnosticKind::InvalidConfig, subject, field)
                        .with_value(*value),
                );
                *value = 0.0;
            }
        }
        if let ContainerWidth::Fraction(v) | ContainerWidth::Fixed(v) = self.width
            && !(v.is_finite() && v >= 0.0)
        {
            diagnostics.push(
                Diagnostic::new(DiagnosticKind::InvalidConfig, subject, "width").with_value(v),
            );
            self.width = ContainerWidth::Fill;
        }
        self
    }

    /// Applies one attribute in its markup spelling.
    ///
    /// On error the style is left unchanged. Numbers are not range-checked
    /// here; [`sanitized`](Self::sanitized) handles that.
    pub fn apply_attribute(&mut self, name: &str, value: &str) -> Result<(), StyleError> {
        match name.trim() {
            "direction" | "flex-direction" => self.direction = value.parse()?,
            "justify-content" => self.justify_content = value.parse()?,
            "align-items" => self.align_items = value.parse()?,
            "align-content" => self.align_content = value.parse()?,
            "wrap" | "flex-wrap" => {
                self.wrap = match value.trim() {
                    "wrap" | "true" | "" => true,
                    "nowrap" | "false" => false,
                    other => {
                        return Err(StyleError::UnknownValue {
                            attribute: "wrap",
                            value: other.to_string(),
                        });
                    }
                }
            }
            "gap" => self.gap = parse_number("gap", value)?,
            "padding" => self.padding = parse_number("padding", value)?,
            "min-height" => self.min_height = parse_number("min-height", value)?,
            other => return Err(StyleError::UnknownAttribute(other.to_string())),
        }
        Ok(())
    }

    /// Builds the backend style for this container.
    ///
    /// Layout roots get a fixed `root_width`; nested containers resolve
    /// [`width`](Self::width) against their parent.
    pub(crate) fn to_taffy(self, root_width: Option<f64>) -> taffy::Style {
        use taffy::style::{
            AlignContent as TAlignContent, AlignItems as TAlignItems, Display,
            FlexDirection as TFlexDirection, FlexWrap,
        };

        let gap = LengthPercentage::length(to_f32(self.gap));
        let padding = LengthPercentage::length(to_f32(self.padding));
        let width = match root_width {
            Some(w) => Dimension::length(to_f32(w)),
            None => self.width.dimension(),
        };
        taffy::Style {
            display: Display::Flex,
            flex_direction: match self.direction {
                FlexDirection::Row => TFlexDirection::Row,
                FlexDirection::Column => TFlexDirection::Column,
                FlexDirection::RowReverse => TFlexDirection::RowReverse,
                FlexDirection::ColumnReverse => TFlexDirection::ColumnReverse,
            },
            flex_wrap: if self.wrap {
                FlexWrap::Wrap
            } else {
                FlexWrap::NoWrap
            },
            justify_content: Some(match self.justify_content {
                JustifyContent::Start => TAlignContent::FlexStart,
                JustifyContent::Center => TAlignContent::Center,
                JustifyContent::End => TAlignContent::FlexEnd,
                JustifyContent::SpaceAround => TAlignContent::SpaceAround,
                JustifyContent::SpaceBetween => TAlignContent::SpaceBetween,
                JustifyContent::SpaceEvenly => TAlignContent::SpaceEvenly,
            }),
            align_items: Some(match self.align_items {
                AlignItems::Start => TAlignItems::FlexStart,
                AlignItems::Center => TAlignItems::Center,
                AlignItems::End => TAlignItems::FlexEnd,
                AlignItems::Stretch => TAlignItems::Stretch,
            }),
            align_content: Some(match self.align_content {
                AlignContent::Start => TAlignContent::FlexStart,
                AlignContent::Center => TAlignContent::Center,
                AlignContent::End => TAlignContent::FlexEnd,
                AlignContent::Stretch => TAlignContent::Stretch,
                AlignContent::SpaceAround => TAlignContent::SpaceAround,
                AlignContent::SpaceBetween => TAlignContent::SpaceBetween,
                AlignContent::SpaceEvenly => TAlignContent::SpaceEvenly,
            }),
            gap: taffy::geometry::Size {
                width: gap,
                height: gap,
            },
            padding: taffy::geometry::Rect {
                left: padding,
                right: padding,
                top: padding,
                bottom: padding,
            },
            size: taffy::geometry::Size {
                width,
                height: Dimension::auto(),
            },
            min_size: taffy::geometry::Size {
                width: Dimension::auto(),
                height: Dimension::length(to_f32(self.min_height)),
            },
            flex_shrink: 0.0,
            ..taffy::Style::default()
        }
    }
}

/// Backend style for a plain node of fixed size.
pub(crate) fn leaf_style(size: Size) -> taffy::Style {
    taffy::Style {
        size: taffy::geometry::Size {
            width: Dimension::length(to_f32(size.width)),
            height: Dimension::length(to_f32(size.height)),
        },
        flex_shrink: 0.0,
        ..taffy::Style::default()
    }
}

/// Clamps a caller-supplied size to finite, non-negative extents.
pub(crate) fn sanitize_size(size: Size, subject: Subject, diagnostics: &mut Vec<Diagnostic>) -> Size {
    let fix = |v: f64| if v.is_finite() && v >= 0.0 { v } else { 0.0 };
    let clean = Size::new(fix(size.width), fix(size.height));
    if clean != size {
        let bad = if clean.width == size.width {
            size.height
        } else {
            size.width
        };
        diagnostics.push(
            Diagnostic::new(DiagnosticKind::InvalidConfig, subject, "intrinsic-size").with_value(bad),
        );
    }
    clean
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the flexbox backend computes in f32"
)]
pub(crate) fn to_f32(v: f64) -> f32 {
    v as f32
}

fn parse_number(attribute: &'static str, value: &str) -> Result<f64, StyleError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| StyleError::InvalidNumber {
            attribute,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_parse_with_aliases() {
        assert_eq!(
            "flex-start".parse::<JustifyContent>(),
            Ok(JustifyContent::Start)
        );
        assert_eq!(
            "space-evenly".parse::<JustifyContent>(),
            Ok(JustifyContent::SpaceEvenly)
        );
        assert_eq!(" center ".parse::<AlignItems>(), Ok(AlignItems::Center));
        assert_eq!(
            "column-reverse".parse::<FlexDirection>(),
            Ok(FlexDirection::ColumnReverse)
        );
        assert_eq!("stretch".parse::<AlignContent>(), Ok(AlignContent::Stretch));
    }

    #[test]
    fn unknown_keyword_is_reported_with_attribute() {
        let err = "diagonal".parse::<FlexDirection>().unwrap_err();
        assert_eq!(
            err,
            StyleError::UnknownValue {
                attribute: "direction",
                value: "diagonal".into(),
            }
        );
    }

    #[test]
    fn apply_attribute_leaves_style_unchanged_on_error() {
        let mut style = FlexStyle::new().with_gap(10.0);
        assert!(style.apply_attribute("justify-content", "sideways").is_err());
        assert!(style.apply_attribute("gap", "wide").is_err());
        assert!(style.apply_attribute("colour", "red").is_err());
        assert_eq!(style, FlexStyle::new().with_gap(10.0));
    }

    #[test]
    fn apply_attribute_sets_fields() {
        let mut style = FlexStyle::new();
        style.apply_attribute("justify-content", "space-between").unwrap();
        style.apply_attribute("gap", "60").unwrap();
        style.apply_attribute("padding", "40").unwrap();
        style.apply_attribute("min-height", "500.5").unwrap();
        style.apply_attribute("wrap", "nowrap").unwrap();
        style.apply_attribute("flex-direction", "column").unwrap();
        assert_eq!(style.justify_content, JustifyContent::SpaceBetween);
        assert_eq!(style.gap, 60.0);
        assert_eq!(style.padding, 40.0);
        assert_eq!(style.min_height, 500.5);
        assert!(!style.wrap);
        assert_eq!(style.direction, FlexDirection::Column);
    }

    #[test]
    fn sanitize_clamps_negative_and_nan() {
        let mut diags = Vec::new();
        let style = FlexStyle::new()
            .with_gap(-5.0)
            .with_padding(f64::NAN)
            .with_min_height(100.0)
            .with_width(ContainerWidth::Fraction(-0.5))
            .sanitized(Subject::Node(3), &mut diags);
        assert_eq!(style.gap, 0.0);
        assert_eq!(style.padding, 0.0);
        assert_eq!(style.min_height, 100.0, "valid values are kept");
        assert_eq!(style.width, ContainerWidth::Fill);
        let fields: Vec<_> = diags.iter().map(|d| d.field).collect();
        assert_eq!(fields, ["gap", "padding", "width"]);
        assert!(
            diags
                .iter()
                .all(|d| d.kind == DiagnosticKind::InvalidConfig && d.subject == Subject::Node(3))
        );
    }

    #[test]
    fn sanitize_size_reports_bad_extent() {
        let mut diags = Vec::new();
        let size = sanitize_size(Size::new(300.0, -1.0), Subject::Node(0), &mut diags);
        assert_eq!(size, Size::new(300.0, 0.0));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].value, -1.0);
    }

    #[test]
    fn width_resolves_against_available() {
        assert_eq!(ContainerWidth::Fill.resolve(944.0), 944.0);
        assert_eq!(ContainerWidth::Fraction(0.5).resolve(944.0), 472.0);
        assert_eq!(ContainerWidth::Fixed(300.0).resolve(944.0), 300.0);
    }
}
