//! Reader for the line-oriented `.dat` input deck.
//!
//! ```text
//! <title>
//! NUMNP NUMEG NLCASE MODEX
//! N bx by bz [brx bry brz] X Y Z        one line per node
//! LL NLOAD                              per load case, then NLOAD lines
//! node direction magnitude
//! NPAR1 NUME NUMMAT                     per element group
//! <NUMMAT material lines> <NUME element lines>
//! ```
//!
//! Blank lines are skipped. Malformed lines fail with [`Error::Input`]
//! carrying the 1-based line number; numbering and reference errors are
//! reported by the [`Model`] builders.

use crate::element::{Element, ElementKind};
use crate::error::{Error, RecordKind, Result};
use crate::load::{LoadCase, NodalLoad};
use crate::material::{BeamSection, Material};
use crate::mesh::Model;
use crate::node::{Node, Restraint};
use crate::types::{Point3, Vec3, DOFS_PER_NODE};
use std::path::Path;
use std::str::FromStr;

/// What the deck asks the driver to do (MODEX).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionMode {
    /// MODEX = 0: read and check the data only.
    DataCheck,
    /// MODEX = 1: run the analysis.
    Execute,
}

impl SolutionMode {
    pub fn code(self) -> u8 {
        match self {
            SolutionMode::DataCheck => 0,
            SolutionMode::Execute => 1,
        }
    }
}

/// A parsed input deck.
#[derive(Debug, Clone)]
pub struct Deck {
    pub model: Model,
    pub mode: SolutionMode,
}

/// Read and parse a deck file.
pub fn read_deck(path: impl AsRef<Path>) -> Result<Deck> {
    let text = std::fs::read_to_string(path)?;
    parse_deck(&text)
}

/// Parse a deck from text.
pub fn parse_deck(text: &str) -> Result<Deck> {
    let mut lines = Lines::new(text);

    let (title_line, title) = lines.raw()?;
    if title.trim().is_empty() {
        return Err(Error::Input {
            line: title_line,
            message: "missing heading line".into(),
        });
    }
    let mut model = Model::new(title.trim());

    let control = lines.next_record("control line")?;
    control.expect_len(&[4])?;
    let n_nodes: usize = control.field(0, "NUMNP")?;
    let n_groups: usize = control.field(1, "NUMEG")?;
    let n_cases: usize = control.field(2, "NLCASE")?;
    let mode = match control.field::<i64>(3, "MODEX")? {
        0 => SolutionMode::DataCheck,
        1 => SolutionMode::Execute,
        other => return Err(control.error(format!("MODEX must be 0 or 1, got {}", other))),
    };

    for _ in 0..n_nodes {
        let line = lines.next_record("nodal point")?;
        model.add_node(parse_node(&line)?)?;
    }

    for _ in 0..n_cases {
        let header = lines.next_record("load case header")?;
        header.expect_len(&[2])?;
        let number: usize = header.field(0, "load case number")?;
        let n_loads: usize = header.field(1, "NLOAD")?;
        let loads = (0..n_loads)
            .map(|_| {
                let line = lines.next_record("concentrated load")?;
                line.expect_len(&[3])?;
                Ok(NodalLoad::new(
                    line.field(0, "node")?,
                    line.field(1, "direction")?,
                    line.field(2, "magnitude")?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        model.add_load_case(LoadCase::new(number, loads))?;
    }

    for _ in 0..n_groups {
        parse_group(&mut lines, &mut model)?;
    }

    Ok(Deck { model, mode })
}

fn parse_node(line: &Record<'_>) -> Result<Node> {
    line.expect_len(&[7, 10])?;
    let n_codes = line.len() - 4;
    let number: usize = line.field(0, "node number")?;
    let mut restraints = [Restraint::Fixed; DOFS_PER_NODE];
    for (slot, restraint) in restraints.iter_mut().enumerate().take(n_codes) {
        *restraint = Restraint::from_code(line.field(1 + slot, "boundary code")?);
    }
    let coords = Point3::new(
        line.field(n_codes + 1, "X")?,
        line.field(n_codes + 2, "Y")?,
        line.field(n_codes + 3, "Z")?,
    );
    Ok(Node::with_restraints(number, coords, restraints))
}

fn parse_group(lines: &mut Lines<'_>, model: &mut Model) -> Result<()> {
    let header = lines.next_record("element group header")?;
    header.expect_len(&[3])?;
    let kind = ElementKind::from_code(header.field(0, "NPAR1")?).map_err(|e| header.error(e))?;
    let n_elements: usize = header.field(1, "NUME")?;
    let n_materials: usize = header.field(2, "NUMMAT")?;

    let materials = (0..n_materials)
        .map(|i| {
            let line = lines.next_record("material set")?;
            let set: usize = line.field(0, "material set number")?;
            if set != i + 1 {
                return Err(Error::Ordering {
                    kind: RecordKind::MaterialSet,
                    expected: i + 1,
                    found: set,
                });
            }
            parse_material(&line, kind).map_err(|e| match e {
                Error::InvalidMaterial(_) => line.error(e),
                other => other,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let group = model.add_group(kind, materials);

    let n_nodes = kind.n_nodes();
    for _ in 0..n_elements {
        let line = lines.next_record("element")?;
        line.expect_len(&[n_nodes + 2])?;
        let number: usize = line.field(0, "element number")?;
        let nodes = (0..n_nodes)
            .map(|i| line.field(1 + i, "node"))
            .collect::<Result<Vec<usize>>>()?;
        let set: usize = line.field(n_nodes + 1, "material set")?;
        model.add_element(group, number, &nodes, set)?;
    }
    Ok(())
}

fn parse_material(line: &Record<'_>, kind: ElementKind) -> Result<Material> {
    match kind {
        ElementKind::Bar(_) => {
            line.expect_len(&[3])?;
            Material::bar(line.field(1, "E")?, line.field(2, "area")?)
        }
        ElementKind::Quadrilateral(_)
        | ElementKind::Triangle(_)
        | ElementKind::Quadrilateral9(_) => {
            line.expect_len(&[3, 4])?;
            let thickness = if line.len() == 4 {
                line.field(3, "thickness")?
            } else {
                1.0
            };
            Material::plane(line.field(1, "E")?, line.field(2, "nu")?, thickness)
        }
        ElementKind::Plate(_) => {
            line.expect_len(&[4])?;
            Material::plane(
                line.field(1, "E")?,
                line.field(2, "nu")?,
                line.field(3, "thickness")?,
            )
        }
        ElementKind::Hexahedron(_) => {
            line.expect_len(&[3])?;
            Material::solid(line.field(1, "E")?, line.field(2, "nu")?)
        }
        ElementKind::Beam(_) => {
            line.expect_len(&[10])?;
            let section = BeamSection {
                area: line.field(3, "area")?,
                iyy: line.field(4, "Iyy")?,
                izz: line.field(5, "Izz")?,
                torsion: line.field(6, "J")?,
                y_axis: Vec3::new(
                    line.field(7, "y axis x")?,
                    line.field(8, "y axis y")?,
                    line.field(9, "y axis z")?,
                ),
            };
            Material::beam(line.field(1, "E")?, line.field(2, "nu")?, section)
        }
    }
}

/// Non-blank lines with their 1-based line numbers.
struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
            last: 0,
        }
    }

    fn raw(&mut self) -> Result<(usize, &'a str)> {
        for (i, text) in self.inner.by_ref() {
            self.last = i + 1;
            if !text.trim().is_empty() {
                return Ok((i + 1, text));
            }
        }
        Err(Error::Input {
            line: self.last + 1,
            message: "unexpected end of input".into(),
        })
    }

    fn next_record(&mut self, what: &str) -> Result<Record<'a>> {
        let (number, text) = self.raw().map_err(|_| Error::Input {
            line: self.last + 1,
            message: format!("unexpected end of input, expected {}", what),
        })?;
        Ok(Record {
            number,
            tokens: text.split_whitespace().collect(),
        })
    }
}

/// One tokenized input line.
struct Record<'a> {
    number: usize,
    tokens: Vec<&'a str>,
}

impl Record<'_> {
    fn len(&self) -> usize {
        self.tokens.len()
    }

    fn error(&self, message: impl ToString) -> Error {
        Error::Input {
            line: self.number,
            message: message.to_string(),
        }
    }

    fn expect_len(&self, allowed: &[usize]) -> Result<()> {
        if allowed.contains(&self.len()) {
            return Ok(());
        }
        let allowed: Vec<String> = allowed.iter().map(usize::to_string).collect();
        Err(self.error(format!(
            "expected {} fields, found {}",
            allowed.join(" or "),
            self.len()
        )))
    }

    fn field<T: FromStr>(&self, index: usize, name: &str) -> Result<T> {
        let token = self
            .tokens
            .get(index)
            .ok_or_else(|| self.error(format!("missing {}", name)))?;
        token
            .parse()
            .map_err(|_| self.error(format!("invalid {} '{}'", name, token)))
    }
}
