use std::future::Future;

use crate::{
    db::dao::{DaoResult, PaginatedResponse},
    error::AppError,
};

pub const PAGE_SIZE: u64 = 10;

/// The `?page=` query value: a 1-based number or `last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Number(u64),
    Last,
}

impl PageRequest {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Number(1)),
            Some("last") => Ok(Self::Last),
            Some(value) => value
                .parse::<u64>()
                .map(Self::Number)
                .map_err(|_| AppError::not_found("Page is not a number")),
        }
    }

    /// Resolves against the row count; an empty list still has page 1.
    pub fn resolve(self, total: u64, page_size: u64) -> Result<u64, AppError> {
        let last = num_pages(total, page_size);
        match self {
            Self::Last => Ok(last),
            Self::Number(number) if (1..=last).contains(&number) => Ok(number),
            Self::Number(number) => Err(AppError::not_found(format!(
                "Invalid page ({number}): that page contains no results"
            ))),
        }
    }
}

pub fn num_pages(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
}

impl<T> Page<T> {
    /// Counts first so that `last` and out-of-range pages resolve before the
    /// rows are read.
    pub async fn fetch<F, Fut>(request: PageRequest, total: u64, load: F) -> Result<Self, AppError>
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = DaoResult<PaginatedResponse<T>>>,
    {
        let number = request.resolve(total, PAGE_SIZE)?;
        let response = load(number).await?;
        Ok(Self {
            items: response.data,
            number,
            num_pages: num_pages(total, PAGE_SIZE),
            total,
        })
    }

    pub fn is_paginated(&self) -> bool {
        self.num_pages > 1
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous_page_number(&self) -> u64 {
        self.number.saturating_sub(1).max(1)
    }

    pub fn next_page_number(&self) -> u64 {
        (self.number + 1).min(self.num_pages)
    }
}
