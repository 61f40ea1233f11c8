//! Shared fixtures for the nozzle tests.
//!
//! The mesh is a 1 × 0.4 rectangle of four quads on a 3 × 3 grid of points
//! (`index = 3·row + column`, `x ∈ {0, 0.5, 1}`, `y ∈ {0, 0.2, 0.4}`). The
//! solution carries uniform `ρ = 1.2`, `ρu = 360` (so `u = 300`),
//! `p = 20000 + 2000·x + 10000·y`, and `T = 250 + 100·x`.
//!
//! Boundary markers follow the generated Euler layouts: 1 is the wall
//! (`y = 0.4`), 6 the outlet, 7 the axis, 8 the inlet and 9 the thrust line
//! at `x = 0.5`.

use std::{fs, path::Path};

use crate::support::{
    gmsh::{Mesher, MesherError},
    su2::{Solution, Solver, SolverError, Su2Config, Su2Mesh},
};

pub(crate) const CASE: &str = r#"
method = "euler"

[environment]
pressure = 18753.9
temperature = 216.65

[mission]
mach = 0.9

[wall]
x = [0.0, 0.3, 0.6, 0.9]
y = [0.4244, 0.30, 0.33, 0.36]
x_thrust = 0.6

[mesh]
hl = [0.1, 0.07, 0.06, 0.006, 0.0108]

[[qoi]]
name = "THRUST"

[[qoi]]
name = "WALL_PRES_AVG"

[[qoi]]
name = "WALL_TEMP_AVG"

[[qoi]]
name = "SU2_RESIDUAL"
"#;

pub(crate) const TEMPLATE: &str = "\
% Nozzle template
%
SOLVER= NAVIER_STOKES
MACH_NUMBER= 0.5
FREESTREAM_PRESSURE= 101325.0
% Numerics
CFL_NUMBER= 5.0
EXT_ITER= 2000
";

pub(crate) const MESH: &str = "\
NDIME= 2
NELEM= 4
9 0 1 4 3 0
9 1 2 5 4 1
9 3 4 7 6 2
9 4 5 8 7 3
NPOIN= 9
0.0 0.0 0
0.5 0.0 1
1.0 0.0 2
0.0 0.2 3
0.5 0.2 4
1.0 0.2 5
0.0 0.4 6
0.5 0.4 7
1.0 0.4 8
NMARK= 5
MARKER_TAG= 1
MARKER_ELEMS= 2
3 6 7
3 7 8
MARKER_TAG= 6
MARKER_ELEMS= 2
3 2 5
3 5 8
MARKER_TAG= 7
MARKER_ELEMS= 2
3 0 1
3 1 2
MARKER_TAG= 8
MARKER_ELEMS= 2
3 0 3
3 3 6
MARKER_TAG= 9
MARKER_ELEMS= 2
3 1 4
3 4 7
";

pub(crate) const SOLUTION: &str = "\
\"PointID\"\t\"x\"\t\"y\"\t\"Density\"\t\"Momentum_x\"\t\"Momentum_y\"\t\"Energy\"\t\"Pressure\"\t\"Temperature\"\t\"Mach\"
0\t0.0\t0.0\t1.2\t360.0\t0.0\t250000.0\t20000.0\t250.0\t0.9
1\t0.5\t0.0\t1.2\t360.0\t0.0\t250000.0\t21000.0\t300.0\t0.9
2\t1.0\t0.0\t1.2\t360.0\t0.0\t250000.0\t22000.0\t350.0\t0.9
3\t0.0\t0.2\t1.2\t360.0\t0.0\t250000.0\t22000.0\t250.0\t0.9
4\t0.5\t0.2\t1.2\t360.0\t0.0\t250000.0\t23000.0\t300.0\t0.9
5\t1.0\t0.2\t1.2\t360.0\t0.0\t250000.0\t24000.0\t350.0\t0.9
6\t0.0\t0.4\t1.2\t360.0\t0.0\t250000.0\t24000.0\t250.0\t0.9
7\t0.5\t0.4\t1.2\t360.0\t0.0\t250000.0\t25000.0\t300.0\t0.9
8\t1.0\t0.4\t1.2\t360.0\t0.0\t250000.0\t26000.0\t350.0\t0.9
";

/// Density residual falls from -1.0 to -6.5.
pub(crate) const HISTORY: &str = "\
\"Iteration\",\"Res_Flow[0]\",\"Res_Flow[1]\"
0, -1.0, -0.8
1, -3.2, -2.9
2, -6.5, -6.1
";

/// Density residual rises from -3.0 to -1.5.
pub(crate) const DIVERGED_HISTORY: &str = "\
\"Iteration\",\"Res_Flow[0]\",\"Res_Flow[1]\"
0, -3.0, -2.8
1, -2.1, -2.0
2, -1.5, -1.4
";

pub(crate) fn mesh() -> Su2Mesh {
    Su2Mesh::parse(MESH, "fixture.su2").unwrap()
}

pub(crate) fn solution() -> Solution {
    Solution::parse(SOLUTION, "fixture.dat").unwrap()
}

/// Writes the fixture mesh instead of running Gmsh.
pub(crate) struct FakeMesher;

impl Mesher for FakeMesher {
    fn mesh(&self, script: &Path, output: &Path) -> Result<(), MesherError> {
        assert!(script.exists(), "missing script {}", script.display());
        fs::write(output, MESH).unwrap();
        Ok(())
    }
}

/// Writes the fixture solution and `history` where the configuration asks.
pub(crate) struct FakeSolver {
    pub history: &'static str,
}

impl Solver for FakeSolver {
    fn solve(&self, config: &Path, run_dir: &Path) -> Result<(), SolverError> {
        let config = Su2Config::read(&run_dir.join(config)).unwrap();
        let get = |key: &str| config.get(key).unwrap();

        let extension = match get("TABULAR_FORMAT") {
            "CSV" => "csv",
            _ => "dat",
        };
        fs::write(run_dir.join(get("RESTART_FILENAME")), SOLUTION).unwrap();
        fs::write(
            run_dir.join(format!("{}.{extension}", get("CONV_FILENAME"))),
            self.history,
        )
        .unwrap();
        Ok(())
    }
}
