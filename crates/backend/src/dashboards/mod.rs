pub mod d404_superstore_overview;
