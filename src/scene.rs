//! Assembles parsed statements into a geometric scene.

use std::collections::HashSet;
use std::fmt::{self, Display};

use tracing::trace;

use crate::ast::{Expression, Identifier, OperatorKind, Statement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Point,
    Segment,
    Line,
    Triangle,
    Polygon,
    Circle,
}

impl ShapeKind {
    /// The shape a command such as `\circle{O}` constructs.
    fn from_command(name: &str) -> Option<Self> {
        Some(match name {
            "point" => Self::Point,
            "segment" => Self::Segment,
            "line" | "overleftrightarrow" => Self::Line,
            "polygon" => Self::Polygon,
            "circle" => Self::Circle,
            _ => return None,
        })
    }
}

/// A shape over an ordered list of points.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Construction {
    pub shape: ShapeKind,
    pub points: Vec<Identifier>,
}

impl Display for Construction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ", self.shape)?;
        self.points.iter().try_for_each(|p| write!(f, "{p}"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub constructions: Vec<Construction>,
    pub statements: Vec<Statement>,
    seen: HashSet<Construction>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_statements(statements: impl IntoIterator<Item = Statement>) -> Self {
        let mut scene = Self::new();
        for statement in statements {
            scene.add_statement(statement);
        }
        scene
    }

    /// Record a statement along with the constructions its operands name.
    pub fn add_statement(&mut self, statement: Statement) {
        self.collect(&statement.left);
        self.collect(&statement.right);
        self.statements.push(statement);
    }

    /// Every point in the scene, in order of first appearance.
    pub fn points(&self) -> impl Iterator<Item = &Identifier> {
        self.constructions
            .iter()
            .filter(|c| c.shape == ShapeKind::Point)
            .flat_map(|c| c.points.iter())
    }

    fn add(&mut self, shape: ShapeKind, points: &[Identifier]) {
        let construction = Construction {
            shape,
            points: points.to_vec(),
        };
        if self.seen.insert(construction.clone()) {
            trace!(%construction, "new construction");
            self.constructions.push(construction);
        }
    }

    fn add_points(&mut self, points: &[Identifier]) {
        for point in points {
            self.add(ShapeKind::Point, std::slice::from_ref(point));
        }
    }

    fn collect(&mut self, expr: &Expression) {
        match expr {
            Expression::Number(_) => {}
            Expression::Identifier(_) | Expression::Points(_) => {
                let points = expr.as_points().unwrap_or_default();
                self.add_points(points);
                if points.len() == 2 {
                    self.add(ShapeKind::Segment, points);
                }
            }
            Expression::Unary { operator, operand } => match operand.as_points() {
                Some(points) => {
                    self.add_points(points);
                    match (operator.kind, points.len()) {
                        (OperatorKind::Overline, 2) => self.add(ShapeKind::Segment, points),
                        (OperatorKind::Triangle, 3) => self.add(ShapeKind::Triangle, points),
                        (OperatorKind::Triangle, n) if n > 3 => {
                            self.add(ShapeKind::Polygon, points);
                        }
                        (OperatorKind::Odot, _) => self.add(ShapeKind::Circle, points),
                        _ => {}
                    }
                }
                None => self.collect(operand),
            },
            Expression::Binary { left, right, .. } => {
                self.collect(left);
                self.collect(right);
            }
            Expression::Call { callee, groups } => {
                let points: Option<Vec<Identifier>> = groups
                    .iter()
                    .flatten()
                    .map(|arg| arg.as_points().map(<[Identifier]>::to_vec))
                    .collect::<Option<Vec<_>>>()
                    .map(|groups| groups.concat());

                match (ShapeKind::from_command(&callee.name), points) {
                    (Some(shape), Some(points)) if !points.is_empty() => {
                        self.add_points(&points);
                        if shape != ShapeKind::Point {
                            self.add(shape, &points);
                        }
                    }
                    _ => groups.iter().flatten().for_each(|arg| self.collect(arg)),
                }
            }
        }
    }
}

impl Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "constructions:")?;
        for construction in &self.constructions {
            writeln!(f, "    {construction}")?;
        }
        writeln!(f, "statements:")?;
        for statement in &self.statements {
            writeln!(f, "    {statement}")?;
        }
        Ok(())
    }
}
