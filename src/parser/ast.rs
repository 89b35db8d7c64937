//! Abstract Syntax Tree types for the scene description language

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// AST node with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Valid identifier (alphanumeric + underscore, starts with letter/_)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Root AST node - a complete scene
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub statements: Vec<Spanned<Statement>>,
}

/// Statement in a scene or inside a control block
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Control declaration: `button ok [width: 80] { ... }`
    Control(ControlDecl),
    /// Edge constraint: `constrain a.left = b.right + 5`
    Constrain(ConstrainDecl),
}

/// Control declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ControlDecl {
    /// Declared with the `decor` prefix: owned as a decoration of the
    /// enclosing control instead of as a child
    pub decoration: bool,
    pub control_type: Spanned<ControlType>,
    pub name: Spanned<Identifier>,
    pub modifiers: Vec<Spanned<Modifier>>,
    pub children: Vec<Spanned<Statement>>,
}

/// Declarable control types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlType {
    Control,
    Label,
    Image,
    Button,
    Panel,
    /// Window widget; nested declarations go into its body
    Window,
    /// Scroll panel; nested declarations go into its content
    Scroll,
}

impl ControlType {
    pub fn keyword(self) -> &'static str {
        match self {
            ControlType::Control => "control",
            ControlType::Label => "label",
            ControlType::Image => "image",
            ControlType::Button => "button",
            ControlType::Panel => "panel",
            ControlType::Window => "window",
            ControlType::Scroll => "scroll",
        }
    }
}

/// A `key: value` pair in a modifier block
#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub key: Spanned<Identifier>,
    pub value: Spanned<Value>,
}

/// Modifier values
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    /// Bare word such as `horizontal` or `init`
    Keyword(String),
}

impl Value {
    /// Short description for error messages
    pub fn describe(&self) -> String {
        match self {
            Value::Number(n) => format!("number {}", n),
            Value::Bool(b) => format!("boolean {}", b),
            Value::Keyword(k) => format!("'{}'", k),
        }
    }
}

/// What an edge reference points at
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Viewport,
    Control(Identifier),
}

/// `target.edge`
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRef {
    pub target: Spanned<Target>,
    pub edge: Spanned<Identifier>,
}

/// Constraint declaration: `constrain subject.edge = anchor.edge [+|- distance] [modifiers]`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainDecl {
    pub subject: EdgeRef,
    pub anchor: EdgeRef,
    /// Signed distance, zero when omitted
    pub distance: f64,
    pub modifiers: Vec<Spanned<Modifier>>,
}
