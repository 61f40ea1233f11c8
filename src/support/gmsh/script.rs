use std::{
    fmt::Write as _,
    fs,
    io,
    path::{Path, PathBuf},
};

/// Mesh-size box field: `v_in` inside the box, `v_out` elsewhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxField {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub v_in: f64,
    pub v_out: f64,
}

/// Boundary-layer field grown off a set of curves.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLayerField {
    pub edges: Vec<i64>,
    pub nodes: Vec<i64>,
    pub h_far: f64,
    /// First cell height normal to the wall.
    pub h_wall_n: f64,
    pub h_wall_t: f64,
    pub ratio: f64,
    pub thickness: f64,
}

/// An in-memory Gmsh `.geo` script.
///
/// Coordinates and sizes are written with six decimals, matching what Gmsh
/// scripts produced by `printf("%lf")` look like.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoScript {
    text: String,
}

impl GeoScript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn point(&mut self, id: i64, x: f64, y: f64, size: f64) {
        self.push(format_args!("Point({id}) = {{{x:.6}, {y:.6}, 0, {size:.6}}};"));
    }

    pub fn line(&mut self, id: i64, start: i64, end: i64) {
        self.push(format_args!("Line({id}) = {{{start}, {end}}};"));
    }

    pub fn bspline(&mut self, id: i64, points: &[i64]) {
        self.push(format_args!("BSpline({id}) = {{{}}};", join(points)));
    }

    /// Curve loop; negative tags reverse the curve orientation.
    pub fn line_loop(&mut self, id: i64, curves: &[i64]) {
        self.push(format_args!("Line Loop({id}) = {{{}}};", join(curves)));
    }

    pub fn plane_surface(&mut self, id: i64, loops: &[i64]) {
        self.push(format_args!("Plane Surface({id}) = {{{}}};", join(loops)));
    }

    pub fn delete_surface(&mut self, id: i64) {
        self.push(format_args!("Delete {{\n  Surface{{{id}}};\n}}"));
    }

    pub fn physical_line(&mut self, id: i64, curves: &[i64]) {
        self.push(format_args!("Physical Line({id}) = {{{}}};", join(curves)));
    }

    pub fn physical_surface(&mut self, id: i64, surfaces: &[i64]) {
        self.push(format_args!("Physical Surface({id}) = {{{}}};", join(surfaces)));
    }

    pub fn box_field(&mut self, id: i64, field: &BoxField) {
        self.push(format_args!("Field[{id}] = Box;"));
        self.push(format_args!("Field[{id}].VIn = {:.6};", field.v_in));
        self.push(format_args!("Field[{id}].VOut = {:.6};", field.v_out));
        self.push(format_args!("Field[{id}].XMin = {:.6};", field.x_min));
        self.push(format_args!("Field[{id}].XMax = {:.6};", field.x_max));
        self.push(format_args!("Field[{id}].YMin = {:.6};", field.y_min));
        self.push(format_args!("Field[{id}].YMax = {:.6};", field.y_max));
    }

    pub fn min_field(&mut self, id: i64, fields: &[i64]) {
        self.push(format_args!("Field[{id}] = Min;"));
        self.push(format_args!("Field[{id}].FieldsList = {{{}}};", join(fields)));
    }

    pub fn background_field(&mut self, id: i64) {
        self.push(format_args!("Background Field = {id};"));
    }

    pub fn boundary_layer_field(&mut self, id: i64, field: &BoundaryLayerField) {
        self.push(format_args!("Field[{id}] = BoundaryLayer;"));
        self.push(format_args!("Field[{id}].EdgesList = {{{}}};", join(&field.edges)));
        self.push(format_args!("Field[{id}].NodesList = {{{}}};", join(&field.nodes)));
        self.push(format_args!("Field[{id}].hfar = {};", field.h_far));
        self.push(format_args!("Field[{id}].hwall_n = {:.6e};", field.h_wall_n));
        self.push(format_args!("Field[{id}].hwall_t = {:.6};", field.h_wall_t));
        self.push(format_args!("Field[{id}].ratio = {:.6e};", field.ratio));
        self.push(format_args!("Field[{id}].thickness = {:.6e};", field.thickness));
        self.push(format_args!("BoundaryLayer Field = {id};"));
    }

    /// Writes the script to `path` and a companion `<path>.opt` options file.
    ///
    /// The options file asks Gmsh to tag saved elements by physical group,
    /// which is what turns physical lines into SU2 markers.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if either file can't be written.
    pub fn write(&self, path: &Path) -> io::Result<()> {
        fs::write(path, &self.text)?;
        fs::write(options_path(path), "Mesh.SaveElementTagType = 2;\n")?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }

    fn push(&mut self, statement: std::fmt::Arguments<'_>) {
        // Writing into a String can't fail.
        let _ = self.text.write_fmt(statement);
        self.text.push('\n');
    }
}

/// Path of the `.opt` file Gmsh reads alongside `script`.
#[must_use]
pub(crate) fn options_path(script: &Path) -> PathBuf {
    let mut name = script.as_os_str().to_owned();
    name.push(".opt");
    PathBuf::from(name)
}

fn join(ids: &[i64]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
