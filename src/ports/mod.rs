use crate::domain::ast::ChangeRecord;

pub trait ReportSink {
    fn write(&self, records: &[ChangeRecord], path: &str) -> std::io::Result<()>;
}
