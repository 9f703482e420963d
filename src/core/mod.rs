// Domain-layer modules and shared errors/models
pub mod dashboard {
    pub use crate::dashboard::*;
}

pub mod dates {
    pub use crate::dates::*;
}

pub mod distribution {
    pub use crate::distribution::*;
}

pub mod gauge {
    pub use crate::gauge::*;
}

pub mod reference {
    pub use crate::reference::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
