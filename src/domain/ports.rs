use crate::domain::model::{ScanOutcome, SourceUnit};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_paths(&self) -> &[String];
    fn remote_endpoint(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn name_filter(&self) -> Option<&str>;
    fn kind_filter(&self) -> &[String];
    fn archive_name(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceUnit>>;
    async fn transform(&self, units: Vec<SourceUnit>) -> Result<ScanOutcome>;
    async fn load(&self, outcome: ScanOutcome) -> Result<String>;
}
