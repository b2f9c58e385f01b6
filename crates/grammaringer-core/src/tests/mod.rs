mod correction;
