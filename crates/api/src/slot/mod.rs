mod add_custom_slot;
mod edit_slot_time;
mod load_slots;
mod remove_custom_slot;
mod toggle_slot;

pub use add_custom_slot::AddCustomSlotUseCase;
pub use edit_slot_time::EditSlotTimeUseCase;
pub use load_slots::LoadSlotsUseCase;
pub use remove_custom_slot::RemoveCustomSlotUseCase;
pub use toggle_slot::ToggleSlotUseCase;
