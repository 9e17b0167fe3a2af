//! Fixed-width text report of an analysis.
//!
//! Real numbers are written in scientific notation with five decimals and a
//! signed two-digit exponent (`1.00000e-02`).

use crate::analysis::{nodal_displacements, Solution, SystemSummary, TimeLog};
use crate::element::{Element, ElementKind};
use crate::error::Result;
use crate::input::SolutionMode;
use crate::material::{Material, Section};
use crate::mesh::{ElementGroup, Model};
use crate::stress::GroupStress;
use std::io::Write;

/// Format `value` as `d.ddddde±XX`.
pub fn sci(value: f64) -> String {
    let text = format!("{:.5e}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exp.abs())
            }
            Err(_) => text,
        },
        // inf and NaN
        None => text,
    }
}

/// Report writer over any byte sink.
pub struct Report<W: Write> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn heading(&mut self, model: &Model) -> Result<()> {
        writeln!(self.out, "TITLE : {}", model.title)?;
        writeln!(self.out)?;
        Ok(())
    }

    pub fn control_information(&mut self, model: &Model, mode: SolutionMode) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "C O N T R O L   I N F O R M A T I O N")?;
        writeln!(out)?;
        writeln!(
            out,
            "      NUMBER OF NODAL POINTS . . . . . . . . . . (NUMNP)  ={:>6}",
            model.n_nodes()
        )?;
        writeln!(
            out,
            "      NUMBER OF ELEMENT GROUPS . . . . . . . . . (NUMEG)  ={:>6}",
            model.groups().len()
        )?;
        writeln!(
            out,
            "      NUMBER OF LOAD CASES . . . . . . . . . . . (NLCASE) ={:>6}",
            model.load_cases().len()
        )?;
        writeln!(
            out,
            "      SOLUTION MODE  . . . . . . . . . . . . . . (MODEX)  ={:>6}",
            mode.code()
        )?;
        writeln!(out, "         EQ.0, DATA CHECK")?;
        writeln!(out, "         EQ.1, EXECUTION")?;
        writeln!(out)?;
        Ok(())
    }

    pub fn nodal_point_data(&mut self, model: &Model) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, " N O D A L   P O I N T   D A T A")?;
        writeln!(out)?;
        writeln!(out, "    NODE       BOUNDARY                         NODAL POINT")?;
        writeln!(out, "   NUMBER  CONDITION  CODES                     COORDINATES")?;
        for node in model.nodes() {
            write!(out, "{:>9}", node.number)?;
            for restraint in &node.restraints[..3] {
                write!(out, "{:>5}", restraint.code())?;
            }
            writeln!(
                out,
                "{:>18}{:>15}{:>15}",
                sci(node.coords.x),
                sci(node.coords.y),
                sci(node.coords.z)
            )?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Equation number table; constrained slots print 0.
    pub fn equation_numbers(&mut self, model: &Model) -> Result<()> {
        let out = &mut self.out;
        let rotations = model
            .nodes()
            .iter()
            .any(|n| n.dofs[3..].iter().any(|d| d.equation().is_some()));
        let slots = if rotations { 6 } else { 3 };

        writeln!(out, " EQUATION NUMBERS")?;
        writeln!(out)?;
        writeln!(out, "   NODE NUMBER   DEGREES OF FREEDOM")?;
        if rotations {
            writeln!(out, "        N           X    Y    Z   RX   RY   RZ")?;
        } else {
            writeln!(out, "        N           X    Y    Z")?;
        }
        for node in model.nodes() {
            write!(out, "{:>9}       ", node.number)?;
            for dof in &node.dofs[..slots] {
                write!(out, "{:>5}", dof.code())?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
        Ok(())
    }

    pub fn element_groups(&mut self, model: &Model) -> Result<()> {
        writeln!(self.out, " E L E M E N T   G R O U P   D A T A")?;
        writeln!(self.out)?;
        writeln!(self.out)?;
        for group in model.groups() {
            self.element_group(group)?;
        }
        Ok(())
    }

    fn element_group(&mut self, group: &ElementGroup) -> Result<()> {
        let out = &mut self.out;
        let kind = group.kind();
        writeln!(out, " E L E M E N T   D E F I N I T I O N")?;
        writeln!(out)?;
        writeln!(
            out,
            " ELEMENT TYPE  . . . . . . . . . . . . .( NPAR(1) ) . . ={:>5}",
            kind.code()
        )?;
        writeln!(out, "     EQ.1, TRUSS ELEMENTS")?;
        writeln!(out, "     EQ.2, QUADRILATERAL ELEMENTS")?;
        writeln!(out, "     EQ.3, TRIANGLE ELEMENTS")?;
        writeln!(out, "     EQ.4, HEXAHEDRON ELEMENTS")?;
        writeln!(out, "     EQ.5, BEAM ELEMENTS")?;
        writeln!(out, "     EQ.6, PLATE ELEMENTS")?;
        writeln!(out, "     EQ.10, 9-NODE QUADRILATERAL ELEMENTS")?;
        writeln!(out)?;
        writeln!(
            out,
            " NUMBER OF ELEMENTS. . . . . . . . . . .( NPAR(2) ) . . ={:>5}",
            group.n_elements()
        )?;
        writeln!(out)?;

        writeln!(out, " M A T E R I A L   D E F I N I T I O N")?;
        writeln!(out)?;
        writeln!(out, " NUMBER OF DIFFERENT SETS OF MATERIAL")?;
        writeln!(
            out,
            " AND CROSS-SECTIONAL  CONSTANTS  . . . .( NPAR(3) ) . . ={:>5}",
            group.materials().len()
        )?;
        writeln!(out)?;
        match kind {
            ElementKind::Bar(_) => {
                writeln!(out, "  SET       YOUNG'S     CROSS-SECTIONAL")?;
                writeln!(out, " NUMBER     MODULUS          AREA")?;
                writeln!(out, "               E              A")?;
            }
            ElementKind::Beam(_) => {
                writeln!(out, "  SET       YOUNG'S        POISSON'S          AREA             IYY             IZZ               J")?;
                writeln!(out, " NUMBER     MODULUS          RATIO")?;
                writeln!(out, "               E              nu")?;
            }
            ElementKind::Quadrilateral(_)
            | ElementKind::Triangle(_)
            | ElementKind::Quadrilateral9(_)
            | ElementKind::Plate(_) => {
                writeln!(out, "  SET       YOUNG'S        POISSON'S       THICKNESS")?;
                writeln!(out, " NUMBER     MODULUS          RATIO")?;
                writeln!(out, "               E              nu              t")?;
            }
            ElementKind::Hexahedron(_) => {
                writeln!(out, "  SET       YOUNG'S        POISSON'S")?;
                writeln!(out, " NUMBER     MODULUS          RATIO")?;
                writeln!(out, "               E              nu")?;
            }
        }
        for (i, material) in group.materials().iter().enumerate() {
            write!(out, "{:>5}", i + 1)?;
            for value in material_columns(material) {
                write!(out, "{:>16}", sci(value))?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
        writeln!(out)?;

        writeln!(out, " E L E M E N T   I N F O R M A T I O N")?;
        let labels = ["I", "J", "K", "L", "M", "N", "O", "P", "Q"];
        let n_nodes = kind.n_nodes();
        write!(out, " ELEMENT ")?;
        for _ in 0..n_nodes {
            write!(out, "    NODE ")?;
        }
        writeln!(out, "     MATERIAL")?;
        write!(out, " NUMBER-N")?;
        for label in labels.iter().take(n_nodes) {
            write!(out, "{:>9}", label)?;
        }
        writeln!(out, "     SET NUMBER")?;
        for element in group.elements() {
            write!(out, "{:>5}    ", element.number)?;
            for node in &element.nodes {
                write!(out, "{:>9}", node + 1)?;
            }
            writeln!(out, "{:>12}", element.material_set)?;
        }
        writeln!(out)?;
        Ok(())
    }

    pub fn load_cases(&mut self, model: &Model) -> Result<()> {
        let out = &mut self.out;
        for case in model.load_cases() {
            writeln!(out, " L O A D   C A S E   D A T A")?;
            writeln!(out)?;
            writeln!(out, "     LOAD CASE NUMBER . . . . . . . ={:>6}", case.number)?;
            writeln!(out, "     NUMBER OF CONCENTRATED LOADS . ={:>6}", case.loads.len())?;
            writeln!(out)?;
            writeln!(out, "    NODE       DIRECTION      LOAD")?;
            writeln!(out, "   NUMBER                   MAGNITUDE")?;
            for load in &case.loads {
                writeln!(
                    out,
                    "{:>7}{:>13}{:>19}",
                    load.node,
                    load.direction,
                    sci(load.magnitude)
                )?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn total_system_data(&mut self, summary: &SystemSummary) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, " T O T A L   S Y S T E M   D A T A")?;
        writeln!(out)?;
        writeln!(
            out,
            "     NUMBER OF EQUATIONS . . . . . . . . . . . . . .(NEQ) = {}",
            summary.neq
        )?;
        writeln!(
            out,
            "     NUMBER OF MATRIX ELEMENTS . . . . . . . . . . .(NWK) = {}",
            summary.nwk
        )?;
        writeln!(
            out,
            "     MAXIMUM HALF BANDWIDTH  . . . . . . . . . . . .(MK ) = {}",
            summary.mk
        )?;
        writeln!(
            out,
            "     MEAN HALF BANDWIDTH . . . . . . . . . . . . . .(MM ) = {}",
            summary.mean_half_bandwidth
        )?;
        writeln!(out)?;
        writeln!(out)?;
        Ok(())
    }

    /// Displacement table of one load case; constrained slots print 0.
    pub fn displacements(&mut self, model: &Model, case: usize, displacements: &[f64]) -> Result<()> {
        let out = &mut self.out;
        let nodal = nodal_displacements(model, displacements);
        let rotations = model
            .nodes()
            .iter()
            .any(|n| n.dofs[3..].iter().any(|d| d.equation().is_some()));

        writeln!(out, " LOAD CASE{:>5}", case)?;
        writeln!(out)?;
        writeln!(out)?;
        writeln!(out, " D I S P L A C E M E N T S")?;
        writeln!(out)?;
        write!(out, "  NODE           X-DISPLACEMENT    Y-DISPLACEMENT    Z-DISPLACEMENT")?;
        if rotations {
            write!(out, "        X-ROTATION        Y-ROTATION        Z-ROTATION")?;
        }
        writeln!(out)?;
        let slots = if rotations { 6 } else { 3 };
        for (node, values) in model.nodes().iter().zip(&nodal) {
            write!(out, "{:>5}        ", node.number)?;
            for value in &values[..slots] {
                write!(out, "{:>18}", sci(*value))?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
        Ok(())
    }

    pub fn group_stresses(&mut self, stresses: &GroupStress) -> Result<()> {
        let out = &mut self.out;
        writeln!(
            out,
            " S T R E S S  C A L C U L A T I O N S  F O R  E L E M E N T  G R O U P{:>5}",
            stresses.group
        )?;
        writeln!(out)?;
        match stresses.kind {
            ElementKind::Bar(_) => {
                writeln!(out, "  ELEMENT             FORCE            STRESS")?;
                writeln!(out, "  NUMBER")?;
                for e in &stresses.elements {
                    let stress = e.points.first().map_or(0.0, |s| s.xx());
                    writeln!(
                        out,
                        "{:>5}{:>22}{:>18}",
                        e.element,
                        sci(e.axial_force.unwrap_or(0.0)),
                        sci(stress)
                    )?;
                }
            }
            ElementKind::Beam(_) => {
                writeln!(out, "  ELEMENT          AXIAL STRESS      AXIAL STRESS")?;
                writeln!(out, "  NUMBER              NODE I            NODE J")?;
                for e in &stresses.elements {
                    write!(out, "{:>5}   ", e.element)?;
                    for point in &e.points {
                        write!(out, "{:>18}", sci(point.xx()))?;
                    }
                    writeln!(out)?;
                }
            }
            ElementKind::Quadrilateral(_)
            | ElementKind::Triangle(_)
            | ElementKind::Quadrilateral9(_)
            | ElementKind::Plate(_) => {
                writeln!(out, "  ELEMENT   POINT             SXX            SYY            SXY")?;
                if matches!(stresses.kind, ElementKind::Plate(_)) {
                    writeln!(out, "  NUMBER    INDEX       (TOP SURFACE BENDING STRESSES)")?;
                } else {
                    writeln!(out, "  NUMBER    INDEX")?;
                }
                for e in &stresses.elements {
                    for (i, s) in e.points.iter().enumerate() {
                        writeln!(
                            out,
                            "{:>5}{:>9}{:>20}{:>15}{:>15}",
                            e.element,
                            i + 1,
                            sci(s.xx()),
                            sci(s.yy()),
                            sci(s.xy())
                        )?;
                    }
                }
            }
            ElementKind::Hexahedron(_) => {
                writeln!(out, "  ELEMENT   POINT             SXX            SYY            SZZ            SXY            SYZ            SZX")?;
                writeln!(out, "  NUMBER    INDEX")?;
                for e in &stresses.elements {
                    for (i, s) in e.points.iter().enumerate() {
                        write!(out, "{:>5}{:>9}     ", e.element, i + 1)?;
                        for component in s.0.iter() {
                            write!(out, "{:>15}", sci(*component))?;
                        }
                        writeln!(out)?;
                    }
                }
            }
        }
        writeln!(out)?;
        Ok(())
    }

    pub fn time_log(&mut self, timings: &TimeLog) -> Result<()> {
        let out = &mut self.out;
        writeln!(out)?;
        writeln!(out, " S O L U T I O N   T I M E   L O G   I N   S E C")?;
        writeln!(out)?;
        writeln!(
            out,
            "     TIME FOR INPUT PHASE = {:.5}",
            timings.input.as_secs_f64()
        )?;
        writeln!(
            out,
            "     TIME FOR CALCULATION OF STIFFNESS MATRIX = {:.5}",
            timings.stiffness.as_secs_f64()
        )?;
        writeln!(
            out,
            "     TIME FOR FACTORIZATION AND LOAD CASE SOLUTIONS = {:.5}",
            timings.solution.as_secs_f64()
        )?;
        writeln!(
            out,
            "     TIME FOR STRESS RECOVERY = {:.5}",
            timings.stress.as_secs_f64()
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "     T O T A L   S O L U T I O N   T I M E = {:.5}",
            timings.total().as_secs_f64()
        )?;
        Ok(())
    }

    /// Input echo: heading, control information, nodes, equations, groups and loads.
    pub fn input_data(&mut self, model: &Model, mode: SolutionMode) -> Result<()> {
        self.heading(model)?;
        self.control_information(model, mode)?;
        self.nodal_point_data(model)?;
        self.equation_numbers(model)?;
        self.element_groups(model)?;
        self.load_cases(model)
    }

    /// Per-case displacements and stresses.
    pub fn solution(&mut self, model: &Model, solution: &Solution) -> Result<()> {
        for case in &solution.cases {
            self.displacements(model, case.case, &case.displacements)?;
            if let Some(field) = &case.stresses {
                for group in &field.groups {
                    self.group_stresses(group)?;
                }
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

fn material_columns(material: &Material) -> Vec<f64> {
    let (e, nu) = (material.youngs_modulus, material.poissons_ratio);
    match &material.section {
        Section::Bar { area } => vec![e, *area],
        Section::Plane { thickness } => vec![e, nu, *thickness],
        Section::Solid => vec![e, nu],
        Section::Beam(s) => vec![e, nu, s.area, s.iyy, s.izz, s.torsion],
    }
}

/// Write the complete report of a run.
///
/// `solution` is `None` in data check mode; the report then ends after the
/// system data.
pub fn write_report<W: Write>(
    out: W,
    model: &Model,
    mode: SolutionMode,
    summary: &SystemSummary,
    solution: Option<&Solution>,
    timings: &TimeLog,
) -> Result<()> {
    let mut report = Report::new(out);
    report.input_data(model, mode)?;
    report.total_system_data(summary)?;
    if let Some(solution) = solution {
        report.solution(model, solution)?;
    }
    report.time_log(timings)?;
    report.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analysis;
    use crate::input::parse_deck;

    const TRUSS: &str = "\
single bar
2 1 1 1
1 1 1 1 0.0 0.0 0.0
2 0 1 1 1.0 0.0 0.0
1 1
2 1 10.0
1 1 1
1 1000.0 1.0
1 1 2 1
";

    fn render() -> String {
        let mut deck = parse_deck(TRUSS).unwrap();
        let solution = Analysis::default().run(&mut deck.model).unwrap();
        let mut buffer = Vec::new();
        write_report(
            &mut buffer,
            &deck.model,
            deck.mode,
            &solution.summary,
            Some(&solution),
            &solution.timings,
        )
        .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_sci_format() {
        assert_eq!(sci(0.01), "1.00000e-02");
        assert_eq!(sci(-1234.5), "-1.23450e+03");
        assert_eq!(sci(0.0), "0.00000e+00");
        assert_eq!(sci(2.0e11), "2.00000e+11");
    }

    #[test]
    fn test_report_sections() {
        let text = render();
        assert!(text.starts_with("TITLE : single bar"));
        for heading in [
            "C O N T R O L   I N F O R M A T I O N",
            " N O D A L   P O I N T   D A T A",
            " EQUATION NUMBERS",
            " E L E M E N T   G R O U P   D A T A",
            " L O A D   C A S E   D A T A",
            " T O T A L   S Y S T E M   D A T A",
            " D I S P L A C E M E N T S",
            " S T R E S S  C A L C U L A T I O N S  F O R  E L E M E N T  G R O U P    1",
            " S O L U T I O N   T I M E   L O G   I N   S E C",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
    }

    #[test]
    fn test_report_values() {
        let text = render();
        assert!(text.contains("(NUMNP)  =     2"));
        assert!(text.contains("(NEQ) = 1"));
        // Node 2, x displacement 0.01; y and z constrained print zero
        let row = text
            .lines()
            .find(|l| l.trim_start().starts_with("2        ") && l.contains("1.00000e-02"))
            .unwrap();
        assert_eq!(row.matches("0.00000e+00").count(), 2);
        // Axial force and stress of the bar
        assert!(text.contains("    1           1.00000e+01       1.00000e+01"));
    }

    #[test]
    fn test_equation_number_table_prints_zero_for_constrained() {
        let mut deck = parse_deck(TRUSS).unwrap();
        deck.model.number_equations();
        let mut report = Report::new(Vec::new());
        report.equation_numbers(&deck.model).unwrap();
        let text = String::from_utf8(report.into_inner()).unwrap();
        assert!(text.contains("        1           0    0    0"));
        assert!(text.contains("        2           1    0    0"));
    }
}
