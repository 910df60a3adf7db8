//! AST node definitions (spec.md §3 "AST").
//!
//! Three disjoint node families share position queries: declarations,
//! statements, expressions. `File` exclusively owns its imports, globals and
//! function declarations; each function exclusively owns its body; block
//! statements exclusively own their child statements; expression nodes form
//! a tree with no sharing.

use milc_lex::TokenKind;
use milc_util::Pos;

#[derive(Debug, Clone)]
pub struct File {
    pub pkg: PackageSpec,
    pub imports: Vec<ImportSpec>,
    pub globals: Vec<VarSpec>,
    pub funcs: Vec<FuncDecl>,
}

#[derive(Debug, Clone)]
pub struct PackageSpec {
    pub pkg_pos: Pos,
    pub name_pos: Pos,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ImportSpec {
    pub import_pos: Pos,
    pub name: Option<Ident>,
    pub path: String,
}

/// Also used for global variable declarations (`File::globals`).
#[derive(Debug, Clone)]
pub struct VarSpec {
    pub var_pos: Pos,
    pub name: Ident,
    pub ty: Option<Ident>,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub func_pos: Pos,
    pub name_pos: Pos,
    pub name: String,
    pub ty: FuncType,
    pub body: Option<BlockStmt>,
}

#[derive(Debug, Clone)]
pub struct FuncType {
    pub func: Pos,
    pub params: FieldList,
    pub result: Option<Ident>,
}

#[derive(Debug, Clone, Default)]
pub struct FieldList {
    pub list: Vec<Field>,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: Ident,
    pub ty: Ident,
}

// ---------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Stmt {
    Block(BlockStmt),
    Var(VarSpec),
    Assign(AssignStmt),
    If(IfStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Branch(BranchStmt),
    Labeled(LabeledStmt),
    Expr(ExprStmt),
    Defer(DeferStmt),
}

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub lbrace: Pos,
    pub list: Vec<Stmt>,
    pub rbrace: Pos,
}

#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub x: Expr,
}

#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub target: Vec<Ident>,
    pub op_pos: Pos,
    pub op: TokenKind,
    pub value: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub if_pos: Pos,
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub body: BlockStmt,
    pub else_: Option<Box<Stmt>>,
}

#[derive(Debug, Clone)]
pub struct ForStmt {
    pub for_pos: Pos,
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: BlockStmt,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub return_pos: Pos,
    pub result: Option<Expr>,
}

/// `break`, `continue`, or `goto` (the latter parsed but never emitted,
/// spec.md §9 open question).
#[derive(Debug, Clone)]
pub struct BranchStmt {
    pub tok_pos: Pos,
    pub tok_kind: TokenKind,
    pub label: Option<Ident>,
}

#[derive(Debug, Clone)]
pub struct LabeledStmt {
    pub label: Ident,
    pub colon: Pos,
    pub stmt: Option<Box<Stmt>>,
}

/// Parsed but never emitted (spec.md §1 Non-goals).
#[derive(Debug, Clone)]
pub struct DeferStmt {
    pub defer_pos: Pos,
    pub call: CallExpr,
}

// ---------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Expr {
    Ident(Ident),
    Int(IntLit),
    Float(FloatLit),
    Char(CharLit),
    Binary(Box<BinaryExpr>),
    Unary(Box<UnaryExpr>),
    Paren(Box<ParenExpr>),
    Call(Box<CallExpr>),
    Selector(Box<SelectorExpr>),
}

impl Expr {
    pub fn pos(&self) -> Pos {
        match self {
            Expr::Ident(i) => i.name_pos,
            Expr::Int(i) => i.value_pos,
            Expr::Float(f) => f.value_pos,
            Expr::Char(c) => c.value_pos,
            Expr::Binary(b) => b.op_pos,
            Expr::Unary(u) => u.op_pos,
            Expr::Paren(p) => p.lparen,
            Expr::Call(c) => c.lparen,
            Expr::Selector(s) => s.x.pos(),
        }
    }
}

/// `Type` here is spec.md §3's syntactic type tag: `"i32"`, `"float"`,
/// `"i8"`, or (opaquely) the source identifier text for anything else.
#[derive(Debug, Clone)]
pub struct Ident {
    pub name_pos: Pos,
    pub name: String,
    pub ty: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IntLit {
    pub value_pos: Pos,
    pub value_end: Pos,
    pub value: i64,
}

#[derive(Debug, Clone)]
pub struct FloatLit {
    pub value_pos: Pos,
    pub value_end: Pos,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct CharLit {
    pub value_pos: Pos,
    pub value_end: Pos,
    pub value: i64,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub op_pos: Pos,
    pub op: TokenKind,
    pub x: Expr,
    pub y: Expr,
}

#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op_pos: Pos,
    pub op: TokenKind,
    pub x: Expr,
}

#[derive(Debug, Clone)]
pub struct ParenExpr {
    pub lparen: Pos,
    pub x: Expr,
    pub rparen: Pos,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub pkg: Option<Ident>,
    pub func_name: Ident,
    pub lparen: Pos,
    pub args: Vec<Expr>,
    pub rparen: Pos,
}

/// `x.Name` property selection. `sel.name` is copied from the receiver's
/// literal rather than the selector token's literal — this looks like a bug
/// but is faithful to `original_source/parser/parse_expr.go`'s observed
/// behavior (spec.md §9 open question); not silently fixed here.
#[derive(Debug, Clone)]
pub struct SelectorExpr {
    pub x: Expr,
    pub sel: Ident,
}
