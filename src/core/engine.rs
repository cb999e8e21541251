use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::ResourceMonitor;

pub struct ScanEngine<P: Pipeline> {
    pipeline: P,
    monitor: ResourceMonitor,
}

impl<P: Pipeline> ScanEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ResourceMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        println!("Starting declaration scan...");

        // Extract
        println!("Reading sources...");
        let units = self.pipeline.extract().await?;
        println!("Read {} source unit(s)", units.len());
        self.monitor.log_stats("Extract");

        // Scan
        println!("Scanning declarations...");
        let outcome = self.pipeline.transform(units).await?;
        println!("Found {} function-like entities", outcome.entities.len());
        self.monitor.log_stats("Scan");

        // Report
        println!("Writing report...");
        let output_path = self.pipeline.load(outcome).await?;
        self.monitor.log_stats("Report");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
