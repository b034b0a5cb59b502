//! Rendering induced trees as C predicate functions.
//!
//! Every function has the shape `int NAME(double *attr)` and returns `1` or
//! `-1`. `attr` is the dense feature array, indexed by the same integer indices
//! as the input file. Thresholds are widened to `f64` before printing, so an
//! `f32` tree compares against the exact value it was trained with.

use std::fmt::{self, Write};

use crate::data::RealNumber;
use crate::trees::node::Node;

const INDENT: &str = "  ";

/// Writes predicate source into any [`fmt::Write`] sink.
pub struct PredicateEmitter<W: Write> {
    out: W,
}

impl<W: Write> PredicateEmitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn finish(self) -> W {
        self.out
    }

    /// `#include` lines needed by [`forest_function`](Self::forest_function).
    pub fn forest_preamble(&mut self) -> fmt::Result {
        writeln!(self.out, "#include <stdlib.h>")?;
        writeln!(self.out)
    }

    /// One nested if/else function for a single tree.
    pub fn tree_function<T: RealNumber>(&mut self, name: &str, root: &Node<T>) -> fmt::Result {
        writeln!(self.out, "int {}(double *attr) {{", name)?;
        self.node(root, 1)?;
        writeln!(self.out, "}}")
    }

    /// Sums the votes of `members` and returns the sign, flipping a coin on a tie.
    pub fn forest_function<S: AsRef<str>>(&mut self, name: &str, members: &[S]) -> fmt::Result {
        writeln!(self.out, "int {}(double *attr) {{", name)?;
        self.line(1, "int votes = 0;")?;
        for member in members {
            self.indent(1)?;
            writeln!(self.out, "votes += {}(attr);", member.as_ref())?;
        }
        self.line(1, "if (votes > 0) {")?;
        self.line(2, "return 1;")?;
        self.line(1, "} else if (votes < 0) {")?;
        self.line(2, "return -1;")?;
        self.line(1, "}")?;
        self.line(1, "return (rand() % 2) ? 1 : -1;")?;
        writeln!(self.out, "}}")
    }

    fn node<T: RealNumber>(&mut self, node: &Node<T>, depth: usize) -> fmt::Result {
        match node {
            Node::Leaf { label } => {
                self.indent(depth)?;
                writeln!(self.out, "return {};", label)
            }
            Node::Internal {
                feature,
                threshold,
                positive,
                negative,
            } => {
                let threshold: f64 = (*threshold).into();
                self.indent(depth)?;
                writeln!(self.out, "if (attr[{}] > {}) {{", feature, threshold)?;
                self.node(positive, depth + 1)?;
                self.line(depth, "} else {")?;
                self.node(negative, depth + 1)?;
                self.line(depth, "}")
            }
        }
    }

    fn line(&mut self, depth: usize, text: &str) -> fmt::Result {
        self.indent(depth)?;
        writeln!(self.out, "{}", text)
    }

    fn indent(&mut self, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            self.out.write_str(INDENT)?;
        }
        Ok(())
    }
}
