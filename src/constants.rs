pub mod pagination {

    pub const DEFAULT_PAGE_SIZE: u64 = 50;

    pub const MAX_PAGE_SIZE: u64 = 200;
}

pub mod notifications {

    pub const DEFAULT_LIST_LIMIT: u64 = 50;

    pub const MAX_LIST_LIMIT: u64 = 200;
}

pub mod reviews {

    pub const MIN_RATING: i32 = 1;

    pub const MAX_RATING: i32 = 5;
}
