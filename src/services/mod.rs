pub mod demand;
pub mod forecasting;
pub mod ingredients;
pub mod pipeline;
pub mod recipes;
pub mod sales;
pub mod sales_preparation;
