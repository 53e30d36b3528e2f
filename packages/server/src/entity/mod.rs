pub mod menu_item;
