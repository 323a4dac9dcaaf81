//! Resolution of `t8 ignore` comments into ignored byte ranges.
//!
//! The source is parsed with swc and flattened into a tree of [`SyntaxNode`]s
//! that only records node kind, span and children in source order. A
//! directive comment is then resolved by a recursive walk that carries the
//! spans of the current node's siblings and of its nearest enclosing block.
//! At either end of a sibling list the enclosing node stands in for the
//! missing sibling, so its start acts as the previous sibling's end and its
//! end as the next sibling's start.

use crate::directive::RangeDirective;
use crate::{ParserKind, SourceError};
use source_map::{ByteOffset, Span};
use swc_common::comments::SingleThreadedComments;
use swc_common::{sync::Lrc, BytePos, FileName, SourceFile, SourceMap, Span as SwcSpan, Spanned};
use swc_ecma_ast::{
    BlockStmt, CatchClause, ClassMember, Decl, Expr, Ident, IdentName, ModuleDecl, Param, Pat,
    Program, Prop, Stmt, SwitchCase, TsTypeAnn, VarDeclarator,
};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};
use tracing::{debug, trace};

impl ParserKind {
    fn syntax(self) -> Syntax {
        match self {
            ParserKind::EcmaScript => Syntax::Es(EsSyntax {
                jsx: false,
                ..Default::default()
            }),
            ParserKind::TypeScript => Syntax::Typescript(TsSyntax {
                tsx: false,
                decorators: true,
                ..Default::default()
            }),
        }
    }
}

/// Coarse node categories. Only blocks change how directives resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Program,
    Block,
    Statement,
    Declaration,
    Expression,
    Pattern,
    Other,
}

#[derive(Debug, Clone)]
pub(crate) struct SyntaxNode {
    pub(crate) kind: NodeKind,
    pub(crate) span: Span,
    pub(crate) children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            span,
            children: Vec::new(),
        }
    }
}

/// A parsed file: its syntax tree and the directive comments found in it.
#[derive(Debug)]
pub(crate) struct ParsedTree {
    pub(crate) root: SyntaxNode,
    pub(crate) directives: Vec<(Span, RangeDirective)>,
}

/// Parses `text` and resolves every `t8 ignore` comment into an ignored range.
///
/// Each range is widened past any `\n`, `;` or `}` directly following it.
/// Comments whose target cannot be located are skipped.
pub fn resolve_ignore_segments(text: &str, parser: ParserKind) -> Result<Vec<Span>, SourceError> {
    let tree = parse_tree(text, parser)?;
    let mut segments = Vec::with_capacity(tree.directives.len());

    for &(comment, directive) in &tree.directives {
        let Some(range) = range_for_directive(&tree.root, comment, directive) else {
            trace!(?comment, ?directive, "no target for ignore directive");
            continue;
        };
        segments.push(absorb_terminators(text, range));
    }

    debug!(
        directives = tree.directives.len(),
        segments = segments.len(),
        "resolved ignore segments"
    );
    Ok(segments)
}

pub(crate) fn parse_tree(text: &str, parser: ParserKind) -> Result<ParsedTree, SourceError> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom("coverage-source".into()).into(),
        text.to_string(),
    );
    let file_start = fm.start_pos;

    let (program, comments) = parse_program(&fm, parser.syntax())?;

    let mut builder = TreeBuilder::new(file_start, Span::from_usize(0, text.len()));
    program.visit_with(&mut builder);

    let (leading, trailing) = comments.borrow_all();
    let mut directives: Vec<(Span, RangeDirective)> = leading
        .values()
        .chain(trailing.values())
        .flatten()
        .filter_map(|comment| {
            let directive = RangeDirective::parse(&comment.text)?;
            Some((relative_span(comment.span, file_start)?, directive))
        })
        .collect();
    directives.sort_by_key(|(span, _)| span.start);
    directives.dedup_by_key(|(span, _)| *span);

    Ok(ParsedTree {
        root: builder.finish(),
        directives,
    })
}

fn parse_program(
    fm: &SourceFile,
    syntax: Syntax,
) -> Result<(Program, SingleThreadedComments), SourceError> {
    let comments = SingleThreadedComments::default();
    let parsed = {
        let mut parser = Parser::new(syntax, StringInput::from(fm), Some(&comments));
        parser.parse_module()
    };
    let module_error = match parsed {
        Ok(module) => return Ok((Program::Module(module), comments)),
        Err(err) => err,
    };

    debug!("module parse failed, retrying as a script");
    let comments = SingleThreadedComments::default();
    let parsed = {
        let mut parser = Parser::new(syntax, StringInput::from(fm), Some(&comments));
        parser.parse_script()
    };
    match parsed {
        Ok(script) => Ok((Program::Script(script), comments)),
        Err(_) => Err(SourceError::Parse {
            message: format!("{:?}", module_error.kind()),
            offset: module_error.span().lo.0.saturating_sub(fm.start_pos.0),
        }),
    }
}

fn relative_span(span: SwcSpan, file_start: BytePos) -> Option<Span> {
    if span.is_dummy() {
        return None;
    }
    Some(Span::new(
        span.lo.0.saturating_sub(file_start.0),
        span.hi.0.saturating_sub(file_start.0),
    ))
}

/// Flattens the swc AST into [`SyntaxNode`]s.
struct TreeBuilder {
    file_start: BytePos,
    root: SyntaxNode,
    open: Vec<SyntaxNode>,
}

impl TreeBuilder {
    fn new(file_start: BytePos, text_span: Span) -> Self {
        Self {
            file_start,
            root: SyntaxNode::new(NodeKind::Program, text_span),
            open: Vec::new(),
        }
    }

    /// Opens a node unless it is a wrapper with the same span as the open one.
    fn open(&mut self, kind: NodeKind, span: SwcSpan) -> bool {
        let Some(span) = relative_span(span, self.file_start) else {
            return false;
        };
        if let Some(current) = self.open.last_mut() {
            if current.span == span {
                if kind == NodeKind::Block {
                    current.kind = NodeKind::Block;
                }
                return false;
            }
        }
        self.open.push(SyntaxNode::new(kind, span));
        true
    }

    fn close(&mut self, opened: bool) {
        if !opened {
            return;
        }
        let Some(mut node) = self.open.pop() else {
            return;
        };
        node.children.sort_by_key(|child| child.span.start);
        self.open
            .last_mut()
            .unwrap_or(&mut self.root)
            .children
            .push(node);
    }

    fn finish(mut self) -> SyntaxNode {
        while !self.open.is_empty() {
            self.close(true);
        }
        self.root.children.sort_by_key(|child| child.span.start);
        self.root
    }
}

macro_rules! track_nodes {
    ($($method:ident($ty:ty) => $kind:expr;)*) => {
        $(
            fn $method(&mut self, node: &$ty) {
                let opened = self.open($kind, node.span());
                node.visit_children_with(self);
                self.close(opened);
            }
        )*
    };
}

impl Visit for TreeBuilder {
    track_nodes! {
        visit_stmt(Stmt) => NodeKind::Statement;
        visit_block_stmt(BlockStmt) => NodeKind::Block;
        visit_decl(Decl) => NodeKind::Declaration;
        visit_module_decl(ModuleDecl) => NodeKind::Declaration;
        visit_var_declarator(VarDeclarator) => NodeKind::Declaration;
        visit_class_member(ClassMember) => NodeKind::Declaration;
        visit_expr(Expr) => NodeKind::Expression;
        visit_prop(Prop) => NodeKind::Expression;
        visit_pat(Pat) => NodeKind::Pattern;
        visit_param(Param) => NodeKind::Pattern;
        visit_ident(Ident) => NodeKind::Other;
        visit_ident_name(IdentName) => NodeKind::Other;
        visit_switch_case(SwitchCase) => NodeKind::Other;
        visit_catch_clause(CatchClause) => NodeKind::Other;
        visit_ts_type_ann(TsTypeAnn) => NodeKind::Other;
    }
}

/// Where a located node sits among its siblings.
#[derive(Debug, Clone, Copy)]
struct Neighbours {
    /// The previous sibling, `None` for the first child.
    prev: Option<Span>,
    /// End of the previous sibling, or the parent's start.
    prev_end: ByteOffset,
    /// Start of the next sibling, or the parent's end.
    next_start: ByteOffset,
    /// The nearest block strictly enclosing the node.
    enclosing_block: Option<Span>,
}

fn range_for_directive(root: &SyntaxNode, comment: Span, directive: RangeDirective) -> Option<Span> {
    let target = walk_children(comment, root, None)?;
    let end = match directive {
        RangeDirective::Next => target.next_start,
        RangeDirective::Rest => target.enclosing_block.unwrap_or(root.span).end,
    };
    Some(Span::new(target.prev_end, end))
}

fn walk_children(
    comment: Span,
    parent: &SyntaxNode,
    enclosing_block: Option<Span>,
) -> Option<Neighbours> {
    let enclosing_block = if parent.kind == NodeKind::Block {
        Some(parent.span)
    } else {
        enclosing_block
    };

    for (i, child) in parent.children.iter().enumerate() {
        let prev = i.checked_sub(1).map(|j| parent.children[j].span);
        let next = parent.children.get(i + 1).map(|n| n.span);
        let neighbours = Neighbours {
            prev,
            prev_end: prev.map_or(parent.span.start, |p| p.end),
            next_start: next.map_or(parent.span.end, |n| n.start),
            enclosing_block,
        };
        if let Some(target) = walk(comment, child, neighbours) {
            return Some(target);
        }
    }
    None
}

fn walk(comment: Span, node: &SyntaxNode, neighbours: Neighbours) -> Option<Neighbours> {
    let follows_comment = match neighbours.prev {
        None => comment.end < node.span.start,
        Some(prev) => prev.end < comment.start && node.span.start > comment.end,
    };
    if follows_comment {
        return Some(neighbours);
    }
    if !node.span.contains_span(comment) {
        return None;
    }
    walk_children(comment, node, neighbours.enclosing_block)
}

fn absorb_terminators(text: &str, mut range: Span) -> Span {
    let bytes = text.as_bytes();
    while let Some(b'\n' | b';' | b'}') = bytes.get(u32::from(range.end) as usize) {
        range = range.widen_end(1);
    }
    range
}
