use std::time::Duration;

/// A handle to a variable of a [`Mip`], valid only for the program that created it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    /// The dense index of the variable within its program
    pub fn index(self) -> usize {
        self.0
    }
}

/// The domain of a decision variable
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarType {
    /// Any real number within the bounds
    Continuous,
    /// Any integer within the bounds
    Integer,
    /// Zero or one
    Binary,
}

/// A typed decision variable with (possibly infinite) bounds
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    /// A name, unique within the program
    pub name: String,
    /// The domain of the variable
    pub var_type: VarType,
    /// The lower bound
    pub lower: f64,
    /// The upper bound
    pub upper: f64,
}

impl Variable {
    /// A continuous variable in `[lower, upper]`
    pub fn continuous(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            var_type: VarType::Continuous,
            lower,
            upper,
        }
    }

    /// An integer variable in `[lower, upper]`
    pub fn integer(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            var_type: VarType::Integer,
            lower,
            upper,
        }
    }

    /// A binary variable
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_type: VarType::Binary,
            lower: 0.0,
            upper: 1.0,
        }
    }
}

/// The comparator of a linear constraint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareType {
    /// `terms <= rhs`
    Leq,
    /// `terms = rhs`
    Eq,
    /// `terms >= rhs`
    Geq,
}

/// A linear constraint `Σ coefficient * variable (<=|=|>=) rhs`
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    name: String,
    compare: CompareType,
    rhs: f64,
    terms: Vec<(VarId, f64)>,
}

impl Constraint {
    /// An empty constraint; add terms with [`Constraint::add_term`]
    pub fn new(name: impl Into<String>, compare: CompareType, rhs: f64) -> Self {
        Self {
            name: name.into(),
            compare,
            rhs,
            terms: Vec::new(),
        }
    }

    /// Adds `coefficient * var` to the left-hand side. Zero coefficients are skipped.
    pub fn add_term(&mut self, coefficient: f64, var: VarId) {
        if coefficient != 0.0 {
            self.terms.push((var, coefficient));
        }
    }

    /// Builder-style variant of [`Constraint::add_term`]
    pub fn with_term(mut self, coefficient: f64, var: VarId) -> Self {
        self.add_term(coefficient, var);
        self
    }

    /// The name of the constraint
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The comparator
    pub fn compare(&self) -> CompareType {
        self.compare
    }

    /// The right-hand side
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// The left-hand side terms, as `(variable, coefficient)` pairs
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Whether the constraint holds for an assignment, up to `tolerance`
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self
            .terms
            .iter()
            .map(|(var, coefficient)| coefficient * values[var.0])
            .sum::<f64>();
        match self.compare {
            CompareType::Leq => lhs <= self.rhs + tolerance,
            CompareType::Eq => (lhs - self.rhs).abs() <= tolerance,
            CompareType::Geq => lhs >= self.rhs - tolerance,
        }
    }
}

/// A mixed-integer program: typed variables, linear constraints, and a linear
/// objective that is to be **maximized**.
///
/// This is the request handed to a [`crate::ports::MipSolver`]. It carries no
/// knowledge of auctions; the model builders own the meaning of each variable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mip {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Vec<(VarId, f64)>,
}

impl Mip {
    /// An empty program
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variable and returns its handle
    pub fn add_variable(&mut self, variable: Variable) -> VarId {
        self.variables.push(variable);
        VarId(self.variables.len() - 1)
    }

    /// Adds a constraint
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Adds `coefficient * var` to the objective
    pub fn add_objective_term(&mut self, coefficient: f64, var: VarId) {
        if coefficient != 0.0 {
            self.objective.push((var, coefficient));
        }
    }

    /// Replaces the objective coefficient of `var`
    pub fn set_objective_coefficient(&mut self, var: VarId, coefficient: f64) {
        match self.objective.iter_mut().find(|(v, _)| *v == var) {
            Some(term) if coefficient != 0.0 => term.1 = coefficient,
            Some(_) => self.objective.retain(|(v, _)| *v != var),
            None => self.add_objective_term(coefficient, var),
        }
    }

    /// Look up a variable by its handle
    ///
    /// # Panics
    ///
    /// Panics if the handle was created by a different program.
    pub fn variable(&self, var: VarId) -> &Variable {
        &self.variables[var.0]
    }

    /// Tightens the upper bound of a variable
    pub fn set_upper_bound(&mut self, var: VarId, upper: f64) {
        let variable = &mut self.variables[var.0];
        variable.upper = variable.upper.min(upper);
    }

    /// Iterate over the variables and their handles
    pub fn variables(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(idx, variable)| (VarId(idx), variable))
    }

    /// The number of variables
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// The constraints
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The objective terms, as `(variable, coefficient)` pairs
    pub fn objective(&self) -> &[(VarId, f64)] {
        &self.objective
    }

    /// The objective value of an assignment
    pub fn evaluate_objective(&self, values: &[f64]) -> f64 {
        self.objective
            .iter()
            .map(|(var, coefficient)| coefficient * values[var.0])
            .sum()
    }
}

/// How a solve terminated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolveStatus {
    /// The assignment is proven optimal
    Optimal,
    /// The time limit was hit; the assignment is the best one found
    TimeLimit,
    /// No feasible assignment exists; the assignment is empty
    Infeasible,
}

/// The response of a solver: one value per variable, plus bookkeeping
#[derive(Clone, Debug, PartialEq)]
pub struct MipSolution {
    values: Vec<f64>,
    objective: f64,
    solve_time: Duration,
    status: SolveStatus,
}

impl MipSolution {
    /// A solution assigning `values[i]` to the variable with index `i`
    pub fn new(values: Vec<f64>, objective: f64, solve_time: Duration, status: SolveStatus) -> Self {
        Self {
            values,
            objective,
            solve_time,
            status,
        }
    }

    /// The response for a program without feasible assignments
    pub fn infeasible(solve_time: Duration) -> Self {
        Self {
            values: Vec::new(),
            objective: f64::NEG_INFINITY,
            solve_time,
            status: SolveStatus::Infeasible,
        }
    }

    /// The value assigned to a variable (zero if the solution has none)
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.0).copied().unwrap_or_default()
    }

    /// All assigned values, by variable index
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The objective value
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// The wall-clock time spent solving
    pub fn solve_time(&self) -> Duration {
        self.solve_time
    }

    /// How the solve terminated
    pub fn status(&self) -> SolveStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_satisfaction() {
        let mut mip = Mip::new();
        let x = mip.add_variable(Variable::integer("x", 0.0, 10.0));
        let y = mip.add_variable(Variable::continuous("y", 0.0, f64::INFINITY));

        let c = Constraint::new("c", CompareType::Leq, 4.0)
            .with_term(1.0, x)
            .with_term(2.0, y)
            .with_term(0.0, y);
        assert_eq!(c.terms().len(), 2);

        assert!(c.is_satisfied(&[2.0, 1.0], 1e-9));
        assert!(!c.is_satisfied(&[2.0, 1.5], 1e-9));
    }

    #[test]
    fn test_upper_bound_only_tightens() {
        let mut mip = Mip::new();
        let x = mip.add_variable(Variable::integer("x", 0.0, 10.0));
        mip.set_upper_bound(x, 3.0);
        mip.set_upper_bound(x, 5.0);
        assert_eq!(mip.variable(x).upper, 3.0);
    }

    #[test]
    fn test_objective_coefficients() {
        let mut mip = Mip::new();
        let x = mip.add_variable(Variable::integer("x", 0.0, 10.0));
        let y = mip.add_variable(Variable::binary("y"));
        mip.add_objective_term(2.0, x);
        mip.set_objective_coefficient(y, -1.0);
        assert_eq!(mip.evaluate_objective(&[3.0, 1.0]), 5.0);

        mip.set_objective_coefficient(x, 1.0);
        mip.set_objective_coefficient(y, 0.0);
        assert_eq!(mip.objective(), &[(x, 1.0)]);
    }
}
