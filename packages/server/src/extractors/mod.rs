pub mod menu_form;
