use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing required table: {0}")]
    MissingTable(&'static str),

    #[error("no matching timetables")]
    NoMatchingTimetables,

    #[error("failed to read {table}: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("failed to render {0}")]
    Render(String),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
