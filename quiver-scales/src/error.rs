use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuiverScaleError {
    #[error("css color parse error")]
    InvalidStyle(#[from] quiver_common::types::ParseColorError),
}
