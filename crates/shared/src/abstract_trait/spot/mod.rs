mod command;
mod query;

pub use self::command::{
    DynSpotCommandRepository, DynSpotCommandService, SpotCommandRepositoryTrait,
    SpotCommandServiceTrait,
};
pub use self::query::{
    DynSpotQueryRepository, DynSpotQueryService, SpotQueryRepositoryTrait, SpotQueryServiceTrait,
};
