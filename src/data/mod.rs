mod countries;
mod dataset;
mod projector;

pub use countries::CountryCodeResolver;
#[cfg(test)]
pub use dataset::CountryRecord;
pub use dataset::MetricDataset;
#[cfg(test)]
pub use projector::{AnimationChartDatum, ChartDatum};
pub use projector::{AnimationChartData, ChartData, project, project_animated};
