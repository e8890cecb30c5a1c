// Handlers module

pub mod health;
pub mod home;
pub mod lookup;
pub mod my_words;
pub mod quiz;
pub mod register;
pub mod remove_word;
pub mod save_word;
pub mod submit_answer;

pub use health::health_handler;
pub use home::home_handler;
pub use lookup::lookup_handler;
pub use my_words::my_words_handler;
pub use quiz::quiz_handler;
pub use register::register_handler;
pub use remove_word::remove_word_handler;
pub use save_word::save_word_handler;
pub use submit_answer::submit_answer_handler;

use crate::error::AppError;

pub(crate) fn reject(err: AppError) -> warp::Rejection {
    warp::reject::custom(err)
}
