//! The page capabilities a coordinator drives

use tabsync_platform::{AddressBar, Document, IntersectionSource, Scheduler};

pub struct Host {
    pub document: Box<dyn Document>,
    pub address: Box<dyn AddressBar>,
    pub scheduler: Box<dyn Scheduler>,
    pub intersections: Box<dyn IntersectionSource>,
}

impl Host {
    pub fn new(
        document: impl Document + 'static,
        address: impl AddressBar + 'static,
        scheduler: impl Scheduler + 'static,
        intersections: impl IntersectionSource + 'static,
    ) -> Self {
        Self {
            document: Box::new(document),
            address: Box::new(address),
            scheduler: Box::new(scheduler),
            intersections: Box::new(intersections),
        }
    }
}
