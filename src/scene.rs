//! Building control trees from parsed scene documents
//!
//! Scene building runs in two passes. The first walks the document and
//! creates every declared control, attaching it to the enclosing control
//! as a child (or as a decoration with the `decor` prefix) and applying
//! its modifiers. The second registers `constrain` statements in document
//! order, so a constraint may name a control declared further down.

use std::collections::{HashMap, HashSet};

use ariadne::{Color, Label, Report, ReportKind, Source};
use log::debug;
use thiserror::Error;

use crate::layout::{
    find_similar, ConstraintCategory, ControlId, ControlTree, Edge, KindTag, LayoutConfig, LayoutError,
    ScrollRestriction, Vec2, Viewport,
};
use crate::parser::ast::{
    ConstrainDecl, ControlDecl, ControlType, Document, EdgeRef, Modifier, Span, Spanned, Statement, Target, Value,
};
use crate::widgets::Window;

/// Modifier keys accepted on control declarations
const CONTROL_MODIFIERS: &[&str] = &[
    "x",
    "y",
    "width",
    "height",
    "min_width",
    "min_height",
    "scale",
    "scale_x",
    "scale_y",
    "origin_x",
    "origin_y",
    "visible",
    "enabled",
    "autosize",
    "clamp",
    "scroll_x",
    "scroll_y",
    "restrict",
];

/// Modifier keys accepted on constrain statements
const CONSTRAIN_MODIFIERS: &[&str] = &["category"];

/// Errors that can occur while building a scene
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("undefined control '{name}'")]
    UndefinedControl {
        name: String,
        span: Span,
        suggestions: Vec<String>,
    },

    #[error("control '{name}' is declared more than once")]
    DuplicateControl { name: String, span: Span, first: Span },

    #[error("unknown edge '{name}'")]
    UnknownEdge {
        name: String,
        span: Span,
        suggestions: Vec<String>,
    },

    #[error("unknown modifier '{name}'")]
    UnknownModifier {
        name: String,
        span: Span,
        suggestions: Vec<String>,
    },

    #[error("invalid value {found} for '{key}': expected {expected}")]
    InvalidValue {
        key: String,
        found: String,
        expected: &'static str,
        span: Span,
    },

    #[error("decoration '{name}' has no control to decorate")]
    OrphanDecoration { name: String, span: Span },

    #[error("the viewport cannot be constrained")]
    ViewportSubject { span: Span },

    #[error("{source}")]
    Layout { source: LayoutError, span: Span },
}

impl SceneError {
    pub fn span(&self) -> &Span {
        match self {
            SceneError::UndefinedControl { span, .. }
            | SceneError::DuplicateControl { span, .. }
            | SceneError::UnknownEdge { span, .. }
            | SceneError::UnknownModifier { span, .. }
            | SceneError::InvalidValue { span, .. }
            | SceneError::OrphanDecoration { span, .. }
            | SceneError::ViewportSubject { span }
            | SceneError::Layout { span, .. } => span,
        }
    }

    /// Close matches for a misspelled name, if any were found
    pub fn suggestions(&self) -> &[String] {
        match self {
            SceneError::UndefinedControl { suggestions, .. }
            | SceneError::UnknownEdge { suggestions, .. }
            | SceneError::UnknownModifier { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().clone();
        let message = self.to_string();

        let mut report = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            );

        if let SceneError::DuplicateControl { first, .. } = self {
            report = report.with_label(
                Label::new((filename, first.clone()))
                    .with_message("first declared here")
                    .with_color(Color::Blue),
            );
        }

        match self.suggestions() {
            [] => {}
            [one] => report = report.with_help(format!("did you mean '{}'?", one)),
            many => {
                let quoted: Vec<String> = many.iter().map(|s| format!("'{}'", s)).collect();
                report = report.with_help(format!("did you mean one of {}?", quoted.join(", ")));
            }
        }

        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = report.finish().write((filename, Source::from(source)), &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// A control tree built from a scene document, with its names resolved
#[derive(Debug)]
pub struct Scene {
    tree: ControlTree,
    names: HashMap<String, ControlId>,
}

impl Scene {
    /// Build a scene laid out against the configured viewport size
    pub fn build(doc: &Document, config: LayoutConfig) -> Result<Self, SceneError> {
        let viewport = config.viewport_size();
        Self::build_with_viewport(doc, viewport, config)
    }

    /// Build a scene against a host-supplied viewport
    pub fn build_with_viewport(
        doc: &Document,
        viewport: impl Viewport + 'static,
        config: LayoutConfig,
    ) -> Result<Self, SceneError> {
        let mut builder = Builder {
            tree: ControlTree::with_config(viewport, config),
            names: HashMap::new(),
            hosts: HashMap::new(),
            constraints: Vec::new(),
        };

        for stmt in &doc.statements {
            builder.declare(stmt, None)?;
        }
        for (decl, span) in std::mem::take(&mut builder.constraints) {
            builder.constrain(decl, span)?;
        }

        debug!(
            "built scene with {} named controls ({} in tree)",
            builder.names.len(),
            builder.tree.len()
        );
        Ok(Self {
            tree: builder.tree,
            names: builder.names.into_iter().map(|(name, (id, _))| (name, id)).collect(),
        })
    }

    /// Look up a declared control by name
    pub fn get(&self, name: &str) -> Option<ControlId> {
        self.names.get(name).copied()
    }

    pub fn tree(&self) -> &ControlTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ControlTree {
        &mut self.tree
    }

    pub fn into_tree(self) -> ControlTree {
        self.tree
    }

    /// Lay out every root with all constraint categories
    pub fn layout(&mut self) -> Result<(), LayoutError> {
        self.tree.layout_all(ConstraintCategory::ALL)
    }
}

struct Builder<'d> {
    tree: ControlTree,
    /// Declared name -> (control, span of the declared name)
    names: HashMap<String, (ControlId, Span)>,
    /// Declared control -> control that receives its nested children
    hosts: HashMap<ControlId, ControlId>,
    constraints: Vec<(&'d ConstrainDecl, Span)>,
}

impl<'d> Builder<'d> {
    fn declare(&mut self, stmt: &'d Spanned<Statement>, owner: Option<ControlId>) -> Result<(), SceneError> {
        match &stmt.node {
            Statement::Constrain(decl) => {
                self.constraints.push((decl, stmt.span.clone()));
                Ok(())
            }
            Statement::Control(decl) => self.declare_control(decl, &stmt.span, owner),
        }
    }

    fn declare_control(&mut self, decl: &'d ControlDecl, span: &Span, owner: Option<ControlId>) -> Result<(), SceneError> {
        let name = decl.name.node.as_str();
        if let Some((_, first)) = self.names.get(name) {
            return Err(SceneError::DuplicateControl {
                name: name.to_string(),
                span: decl.name.span.clone(),
                first: first.clone(),
            });
        }

        let id = match decl.control_type.node {
            ControlType::Window => {
                let window = Window::build(&mut self.tree, name).map_err(|source| SceneError::Layout {
                    source,
                    span: span.clone(),
                })?;
                self.hosts.insert(window.root, window.body);
                for (part, id) in [("title", window.title), ("body", window.body), ("footer", window.footer)] {
                    self.names
                        .insert(format!("{}.{}", name, part), (id, decl.name.span.clone()));
                }
                window.root
            }
            other => self.tree.create(name, kind_tag(other)),
        };
        self.names.insert(name.to_string(), (id, decl.name.span.clone()));

        // Scroll offsets wait until the content exists, since attaching
        // children relays out the panel and clamps its offset
        let (scrolls, modifiers): (Vec<_>, Vec<_>) = decl
            .modifiers
            .iter()
            .partition(|m| matches!(m.node.key.node.as_str(), "scroll_x" | "scroll_y"));
        for modifier in modifiers {
            self.apply_modifier(id, modifier)?;
        }

        let attached = match (owner, decl.decoration) {
            (None, true) => {
                return Err(SceneError::OrphanDecoration {
                    name: name.to_string(),
                    span: decl.name.span.clone(),
                })
            }
            (None, false) => Ok(()),
            (Some(owner), true) => self.tree.add_decoration(owner, id),
            (Some(owner), false) => {
                let host = self.hosts.get(&owner).copied().unwrap_or(owner);
                self.tree.add_child(host, id)
            }
        };
        attached.map_err(|source| SceneError::Layout {
            source,
            span: span.clone(),
        })?;

        for child in &decl.children {
            self.declare(child, Some(id))?;
        }
        for modifier in scrolls {
            self.apply_modifier(id, modifier)?;
        }
        Ok(())
    }

    fn apply_modifier(&mut self, id: ControlId, modifier: &Spanned<Modifier>) -> Result<(), SceneError> {
        let key = modifier.node.key.node.as_str();
        let value = &modifier.node.value;
        let tree = &mut self.tree;
        let (position, size, minimum, scale, origin) = {
            let control = tree.get(id).map_err(|source| layout_error(source, &modifier.span))?;
            (
                control.position(),
                control.size(),
                control.minimum_size(),
                control.scale(),
                control.normalized_origin(),
            )
        };

        let applied = match key {
            "x" => tree.set_position(id, Vec2::new(number(key, value)?, position.y)),
            "y" => tree.set_position(id, Vec2::new(position.x, number(key, value)?)),
            "width" => tree.set_size(id, Vec2::new(number(key, value)?, size.y)),
            "height" => tree.set_size(id, Vec2::new(size.x, number(key, value)?)),
            "min_width" => tree.set_minimum_size(id, Vec2::new(number(key, value)?, minimum.y)),
            "min_height" => tree.set_minimum_size(id, Vec2::new(minimum.x, number(key, value)?)),
            "scale" => tree.set_scale(id, Vec2::splat(number(key, value)?)),
            "scale_x" => tree.set_scale(id, Vec2::new(number(key, value)?, scale.y)),
            "scale_y" => tree.set_scale(id, Vec2::new(scale.x, number(key, value)?)),
            "origin_x" => tree.set_normalized_origin(id, Vec2::new(number(key, value)?, origin.y)),
            "origin_y" => tree.set_normalized_origin(id, Vec2::new(origin.x, number(key, value)?)),
            "visible" => tree.set_visible(id, boolean(key, value)?),
            "enabled" => tree.set_enabled(id, boolean(key, value)?),
            "autosize" => tree.set_auto_size(id, boolean(key, value)?),
            "clamp" => tree.set_scroll_clamp(id, boolean(key, value)?),
            "scroll_x" | "scroll_y" => {
                let amount = number(key, value)?;
                // Content offsets are stored directly; layout clamps them later
                tree.scroll_position(id).and_then(|offset| {
                    let content = tree.child_host(id)?;
                    let offset = if key == "scroll_x" {
                        Vec2::new(amount, offset.y)
                    } else {
                        Vec2::new(offset.x, amount)
                    };
                    tree.set_position(content, offset)
                })
            }
            "restrict" => {
                let restriction = match &value.node {
                    Value::Keyword(word) => ScrollRestriction::from_name(word),
                    _ => None,
                }
                .ok_or_else(|| invalid(key, value, "horizontal, vertical or unrestricted"))?;
                tree.set_scroll_restriction(id, restriction)
            }
            _ => {
                return Err(SceneError::UnknownModifier {
                    name: key.to_string(),
                    span: modifier.node.key.span.clone(),
                    suggestions: suggest(CONTROL_MODIFIERS.iter().copied(), key),
                })
            }
        };
        applied.map_err(|source| layout_error(source, &modifier.span))
    }

    fn constrain(&mut self, decl: &ConstrainDecl, span: Span) -> Result<(), SceneError> {
        let subject = match &decl.subject.target.node {
            Target::Viewport => {
                return Err(SceneError::ViewportSubject {
                    span: decl.subject.target.span.clone(),
                })
            }
            Target::Control(name) => self.resolve(name.as_str(), &decl.subject.target.span)?,
        };
        let anchor = match &decl.anchor.target.node {
            Target::Viewport => None,
            Target::Control(name) => Some(self.resolve(name.as_str(), &decl.anchor.target.span)?),
        };
        let control_edge = edge(&decl.subject)?;
        let anchor_edge = edge(&decl.anchor)?;

        let mut category = ConstraintCategory::ALL;
        for modifier in &decl.modifiers {
            let key = modifier.node.key.node.as_str();
            let value = &modifier.node.value;
            match key {
                "category" => {
                    category = match &value.node {
                        Value::Keyword(word) => ConstraintCategory::from_name(word),
                        _ => None,
                    }
                    .ok_or_else(|| invalid(key, value, "update, init or all"))?;
                }
                _ => {
                    return Err(SceneError::UnknownModifier {
                        name: key.to_string(),
                        span: modifier.node.key.span.clone(),
                        suggestions: suggest(CONSTRAIN_MODIFIERS.iter().copied(), key),
                    })
                }
            }
        }

        self.tree
            .add_constraint(subject, control_edge, anchor, anchor_edge, decl.distance, category)
            .map_err(|source| layout_error(source, &span))?;
        Ok(())
    }

    fn resolve(&self, name: &str, span: &Span) -> Result<ControlId, SceneError> {
        match self.names.get(name) {
            Some((id, _)) => Ok(*id),
            None => {
                let defined: HashSet<String> = self.names.keys().cloned().collect();
                Err(SceneError::UndefinedControl {
                    name: name.to_string(),
                    span: span.clone(),
                    suggestions: find_similar(&defined, name, 2),
                })
            }
        }
    }
}

fn kind_tag(control_type: ControlType) -> KindTag {
    match control_type {
        ControlType::Control => KindTag::Control,
        ControlType::Label => KindTag::Label,
        ControlType::Image => KindTag::Image,
        ControlType::Button => KindTag::Button,
        ControlType::Panel | ControlType::Window => KindTag::Panel,
        ControlType::Scroll => KindTag::ScrollPanel,
    }
}

fn edge(edge_ref: &EdgeRef) -> Result<Edge, SceneError> {
    let name = edge_ref.edge.node.as_str();
    Edge::from_name(name).ok_or_else(|| SceneError::UnknownEdge {
        name: name.to_string(),
        span: edge_ref.edge.span.clone(),
        suggestions: suggest(Edge::NAMES.iter().copied(), name),
    })
}

fn suggest<'a>(candidates: impl Iterator<Item = &'a str>, target: &str) -> Vec<String> {
    let defined: HashSet<String> = candidates.map(str::to_string).collect();
    find_similar(&defined, target, 2)
}

fn number(key: &str, value: &Spanned<Value>) -> Result<f64, SceneError> {
    match value.node {
        Value::Number(n) => Ok(n),
        _ => Err(invalid(key, value, "a number")),
    }
}

fn boolean(key: &str, value: &Spanned<Value>) -> Result<bool, SceneError> {
    match value.node {
        Value::Bool(b) => Ok(b),
        _ => Err(invalid(key, value, "true or false")),
    }
}

fn invalid(key: &str, value: &Spanned<Value>, expected: &'static str) -> SceneError {
    SceneError::InvalidValue {
        key: key.to_string(),
        found: value.node.describe(),
        expected,
        span: value.span.clone(),
    }
}

fn layout_error(source: LayoutError, span: &Span) -> SceneError {
    SceneError::Layout {
        source,
        span: span.clone(),
    }
}
