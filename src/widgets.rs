pub mod density_plot;
pub mod legend;
pub mod region_tree;
pub mod timeline;

pub use density_plot::DensityPlot;
pub use legend::legend;
pub use region_tree::region_tree;
pub use timeline::timeline;
