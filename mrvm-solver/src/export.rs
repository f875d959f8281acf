use mrvm_core::models::{CompareType, Mip, VarId, VarType};
use std::io::Write;

/// Export a program to CPLEX `.lp` format, e.g. to inspect it or hand it to an
/// external solver.
pub fn export_lp(mip: &Mip, buffer: &mut impl Write) -> Result<(), std::io::Error> {
    // https://www.ibm.com/docs/en/icos/22.1.2?topic=cplex-lp-file-format-algebraic-representation
    // is a good reference.
    let name = |var: VarId| mip.variable(var).name.as_str();

    writeln!(buffer, "\\ MRVM winner determination")?;
    writeln!(buffer, "Maximize")?;
    write!(buffer, " welfare:")?;
    write_terms(buffer, mip.objective().iter().map(|&(v, c)| (name(v), c)))?;
    writeln!(buffer)?;

    writeln!(buffer, "Subject To")?;
    for constraint in mip.constraints() {
        if constraint.terms().is_empty() {
            // The LP format cannot express a constraint without terms
            writeln!(buffer, "\\ {} has no terms", constraint.name())?;
            continue;
        }
        write!(buffer, " {}:", constraint.name())?;
        write_terms(
            buffer,
            constraint.terms().iter().map(|&(v, c)| (name(v), c)),
        )?;
        let op = match constraint.compare() {
            CompareType::Leq => "<=",
            CompareType::Eq => "=",
            CompareType::Geq => ">=",
        };
        writeln!(buffer, " {op} {}", constraint.rhs())?;
    }

    // Binaries carry their bounds implicitly
    writeln!(buffer, "Bounds")?;
    for (_, variable) in mip.variables() {
        if variable.var_type == VarType::Binary {
            continue;
        }
        let name = &variable.name;
        match (variable.lower.is_finite(), variable.upper.is_finite()) {
            (true, true) => writeln!(buffer, " {} <= {name} <= {}", variable.lower, variable.upper)?,
            (true, false) => writeln!(buffer, " {name} >= {}", variable.lower)?,
            (false, true) => writeln!(buffer, " -inf <= {name} <= {}", variable.upper)?,
            (false, false) => writeln!(buffer, " {name} free")?,
        }
    }

    for (section, var_type) in [("Generals", VarType::Integer), ("Binaries", VarType::Binary)] {
        let mut variables = mip
            .variables()
            .filter(|(_, variable)| variable.var_type == var_type)
            .peekable();
        if variables.peek().is_none() {
            continue;
        }
        writeln!(buffer, "{section}")?;
        for (_, variable) in variables {
            writeln!(buffer, " {}", variable.name)?;
        }
    }

    writeln!(buffer, "End")?;
    Ok(())
}

fn write_terms<'a>(
    buffer: &mut impl Write,
    terms: impl Iterator<Item = (&'a str, f64)>,
) -> Result<(), std::io::Error> {
    let mut empty = true;
    for (name, coefficient) in terms {
        let sign = if coefficient < 0.0 { '-' } else { '+' };
        write!(buffer, " {sign} {} {name}", coefficient.abs())?;
        empty = false;
    }
    if empty {
        write!(buffer, " 0")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrvm_core::models::{Constraint, Variable};

    #[test]
    fn test_export_lp() {
        let mut mip = Mip::new();
        let v = mip.add_variable(Variable::continuous("v_1", 0.0, 100.0));
        let x = mip.add_variable(Variable::integer("x_1_0_0", 0.0, 4.0));
        let y = mip.add_variable(Variable::binary("y_1_0_0_1"));
        mip.add_objective_term(1.0, v);
        mip.add_objective_term(-0.5, x);
        mip.add_constraint(
            Constraint::new("link", CompareType::Eq, 0.0)
                .with_term(1.0, v)
                .with_term(-25.0, x),
        );
        mip.add_constraint(
            Constraint::new("pick", CompareType::Leq, 1.0)
                .with_term(1.0, x)
                .with_term(-2.0, y),
        );

        let mut buffer = Vec::new();
        export_lp(&mip, &mut buffer).unwrap();
        let lp = String::from_utf8(buffer).unwrap();

        let expected = "\\ MRVM winner determination
Maximize
 welfare: + 1 v_1 - 0.5 x_1_0_0
Subject To
 link: + 1 v_1 - 25 x_1_0_0 = 0
 pick: + 1 x_1_0_0 - 2 y_1_0_0_1 <= 1
Bounds
 0 <= v_1 <= 100
 0 <= x_1_0_0 <= 4
Generals
 x_1_0_0
Binaries
 y_1_0_0_1
End
";
        assert_eq!(lp, expected);
    }
}
