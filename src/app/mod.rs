use anyhow::{Context, Result, anyhow};
use clap::Parser;
use cosmic_tree::config::RunConfig;
use cosmic_tree::coords::LeafCoordinates;
use cosmic_tree::layout::{BranchStyle, LayoutParams, TreeLayouter};
use cosmic_tree::{newick, output};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

/// Lays out a phylogenetic tree in 3D, optionally from 2D/3D leaf coordinates,
/// and writes leaf, internal vertex and branch tables.
#[derive(Parser, Debug, Clone)]
#[command(name = "cosmic-tree", version, about)]
pub struct AppConfig {
    /// Tree in Newick format; only the first tree of the file is used
    #[arg(short, long, value_name = "TREE_FILE", required_unless_present = "param_file")]
    pub tree: Option<PathBuf>,

    /// CSV with a header and the leaf name in the first column, then x, y (and z)
    #[arg(short, long, value_name = "CSV_FILE")]
    pub coordinates: Option<PathBuf>,

    /// Prefix of the output files
    #[arg(short, long, value_name = "PREFIX", default_value = cosmic_tree::config::DEFAULT_OUTPUT_PREFIX)]
    pub output_prefix: PathBuf,

    /// JSON parameter file; all other arguments are ignored when given
    #[arg(short, long, value_name = "JSON_FILE")]
    pub param_file: Option<PathBuf>,

    /// Drag of internal vertices toward their parent, between 0 and 1
    #[arg(long, default_value_t = cosmic_tree::layout::DEFAULT_DRAG)]
    pub drag: f64,

    /// Factor to rescale the z axis
    #[arg(long, default_value_t = 1.0)]
    pub z_scale: f64,

    /// Use the z column of the coordinate file
    #[arg(long)]
    pub use_z_from_file: bool,

    /// Project the tree onto a pseudo-sphere; ignored with --use-z-from-file
    #[arg(long)]
    pub spherical_layout: bool,

    /// Drop leaves not matched between tree and coordinate file instead of failing
    #[arg(long)]
    pub ignore_missing: bool,

    /// Connect children to parents with straight lines instead of right angles
    #[arg(long)]
    pub diagonal: bool,

    /// Place all leaves at the maximum height
    #[arg(long)]
    pub ultrametric: bool,

    /// Factor on the depth axis of topology layouts
    #[arg(long, default_value_t = 1.0)]
    pub branch_scaling_factor: f64,

    /// Factor on the leaf axis of topology layouts
    #[arg(long, default_value_t = 1.0)]
    pub taxon_scaling_factor: f64,

    /// Also write speck mesh and dat files of the branches
    #[arg(long)]
    pub speck: bool,
}

impl AppConfig {
    /// Resolves the arguments (or the parameter file) into a [RunConfig].
    pub fn to_run_config(&self) -> Result<RunConfig> {
        if let Some(param_file) = &self.param_file {
            info!(
                "Reading parameters from {}, ignoring other arguments",
                param_file.display()
            );
            return RunConfig::from_param_file(param_file)
                .with_context(|| format!("failed to load `{}`", param_file.display()));
        }

        let tree = self
            .tree
            .clone()
            .ok_or_else(|| anyhow!("no tree file given"))?;

        let branch_style = if self.diagonal {
            BranchStyle::Diagonal
        } else {
            BranchStyle::Rectangular
        };

        let layout = LayoutParams::default()
            .with_drag(self.drag)
            .with_z_scale(self.z_scale)
            .with_provided_z(self.use_z_from_file)
            .with_spherical_layout(self.spherical_layout)
            .with_ignore_missing(self.ignore_missing)
            .with_branch_style(branch_style)
            .with_ultrametric(self.ultrametric)
            .with_branch_scaling_factor(self.branch_scaling_factor)
            .with_taxon_scaling_factor(self.taxon_scaling_factor);

        Ok(RunConfig {
            tree,
            coordinates: self.coordinates.clone(),
            output_prefix: self.output_prefix.clone(),
            speck: self.speck,
            layout,
        })
    }
}

/// Runs the whole pipeline: read, lay out, write.
///
/// Nothing is written unless the layout succeeded.
pub fn run(config: &RunConfig) -> Result<()> {
    info!("Reading tree from {}", config.tree.display());
    let trees = newick::parse_file(&config.tree)
        .with_context(|| format!("failed to parse `{}`", config.tree.display()))?;
    if trees.len() > 1 {
        warn!("{} trees in file, using the first one", trees.len());
    }
    let tree = trees
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no tree in `{}`", config.tree.display()))?;

    let coordinates = match &config.coordinates {
        Some(path) => {
            info!("Reading leaf coordinates from {}", path.display());
            let coordinates = LeafCoordinates::from_file(path, config.layout.use_provided_z)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            Some(coordinates)
        }
        None => None,
    };

    let layout = TreeLayouter::new(config.layout.clone())
        .layout(&tree, coordinates.as_ref())
        .context("layout failed")?;

    if let Some(dir) = config.output_prefix.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create `{}`", dir.display()))?;
        }
    }

    let written = output::write_layout_files(&layout, &config.output_prefix, config.speck)
        .context("failed to write output")?;
    info!("Wrote {} files", written.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmic_tree::output::{BRANCHES_SUFFIX, INTERNAL_SUFFIX, LEAVES_SUFFIX, output_path};
    use std::path::Path;

    const TABLE_SUFFIXES: [&str; 3] = [LEAVES_SUFFIX, INTERNAL_SUFFIX, BRANCHES_SUFFIX];

    fn fixture(name: &str) -> PathBuf {
        Path::new("tests").join("fixtures").join(name)
    }

    /// Primates tree with a coordinate file holding one row absent from it.
    fn primates_run(test_name: &str) -> (RunConfig, PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "cosmic-tree-run-{}-{}",
            test_name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);

        let mut config = RunConfig::new(fixture("primates.nwk"));
        config.coordinates = Some(fixture("primates_extra.csv"));
        config.output_prefix = dir.join("out").join("primates");
        (config, dir)
    }

    #[test]
    fn test_flags_map_to_layout_params() {
        let config = AppConfig::parse_from([
            "cosmic-tree",
            "-t",
            "t.nwk",
            "--drag",
            "0.4",
            "--diagonal",
            "--use-z-from-file",
        ]);
        let run_config = config.to_run_config().unwrap();
        assert_eq!(run_config.tree, PathBuf::from("t.nwk"));
        assert_eq!(run_config.layout.drag, 0.4);
        assert_eq!(run_config.layout.branch_style, BranchStyle::Diagonal);
        assert!(run_config.layout.use_provided_z);
    }

    #[test]
    fn test_tree_or_param_file_required() {
        assert!(AppConfig::try_parse_from(["cosmic-tree"]).is_err());
        assert!(AppConfig::try_parse_from(["cosmic-tree", "-p", "params.json"]).is_ok());
    }

    #[test]
    fn test_run_writes_nothing_when_layout_fails() {
        let (config, dir) = primates_run("strict");

        let err = run(&config).unwrap_err();
        assert!(format!("{err:#}").contains("Macaca mulatta, rhesus"));
        for suffix in TABLE_SUFFIXES {
            assert!(!output_path(&config.output_prefix, suffix).exists());
        }
        assert!(!dir.exists());
    }

    #[test]
    fn test_run_writes_tables() {
        let (mut config, dir) = primates_run("ignore-missing");
        config.layout = config.layout.with_ignore_missing(true);

        run(&config).unwrap();
        for suffix in TABLE_SUFFIXES {
            assert!(output_path(&config.output_prefix, suffix).is_file());
        }

        let leaves = fs::read_to_string(output_path(&config.output_prefix, LEAVES_SUFFIX)).unwrap();
        assert_eq!(leaves.lines().count(), 1 + 6 + 1);
        assert!(leaves.lines().last().unwrap().starts_with("\"Macaca mulatta, rhesus\",6,3,"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
